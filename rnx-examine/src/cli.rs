use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};
use rinex_examiner::prelude::{Codecs, Compression};

pub struct Cli {
    /// Arguments passed by user
    pub matches: ArgMatches,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        let cmd = Command::new("rnx-examine")
            .version(env!("CARGO_PKG_VERSION"))
            .about("RINEX observation file examiner")
            .long_about(
                "rnx-examine describes a RINEX observation file:
survey and equipment identity, approximate station position,
time span, sampling interval and constellations.
The file is never modified.",
            )
            .arg_required_else_help(true)
            .color(ColorChoice::Always)
            .next_help_heading("Input")
            .arg(
                Arg::new("filepath")
                    .long("fp")
                    .short('f')
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .required_unless_present("codecs")
                    .help("Observation file to examine. See --help for more information.")
                    .long_help(
                        "Plain RINEX (V2 or V3) observation file, possibly compressed.
Supported compressions are gzip, Hatanaka (CRINEX), Unix compress,
bzip2 and zip, and their combinations (.crx.gz for example).

Example:
rnx-examine \\
    --fp test_resources/CRNX/V3/ESBC00DNK_R_20213550000_01H_30S_MO.crx.gz",
                    ),
            )
            .next_help_heading("Output")
            .arg(
                Arg::new("json")
                    .long("json")
                    .short('j')
                    .action(ArgAction::SetTrue)
                    .help("Prints the report as JSON."),
            )
            .arg(
                Arg::new("codecs")
                    .long("codecs")
                    .action(ArgAction::SetTrue)
                    .help("Prints the compression support status and exits."),
            )
            .next_help_heading("Decoders (runtime deactivation)")
            .arg(
                Arg::new("no-hatanaka")
                    .long("no-hatanaka")
                    .action(ArgAction::SetTrue)
                    .help("Disables the CRINEX decoder."),
            )
            .arg(
                Arg::new("no-compress")
                    .long("no-compress")
                    .action(ArgAction::SetTrue)
                    .help("Disables the Unix compress (.Z) decoder."),
            )
            .arg(
                Arg::new("no-bzip2")
                    .long("no-bzip2")
                    .action(ArgAction::SetTrue)
                    .help("Disables the bzip2 decoder."),
            )
            .arg(
                Arg::new("no-zip")
                    .long("no-zip")
                    .action(ArgAction::SetTrue)
                    .help("Disables the zip decoder."),
            );

        Self {
            matches: cmd.get_matches(),
        }
    }

    /// File to examine
    pub fn filepath(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("filepath")
    }

    pub fn json(&self) -> bool {
        self.matches.get_flag("json")
    }

    /// Support status was requested
    pub fn codecs_status(&self) -> bool {
        self.matches.get_flag("codecs")
    }

    /// Decoders, minus the ones disabled by user
    pub fn codecs(&self) -> Codecs {
        let mut codecs = Codecs::default();
        for (flag, compression) in [
            ("no-hatanaka", Compression::Hatanaka),
            ("no-compress", Compression::UnixCompress),
            ("no-bzip2", Compression::Bzip2),
            ("no-zip", Compression::Zip),
        ] {
            if self.matches.get_flag(flag) {
                codecs = codecs.without(compression);
            }
        }
        codecs
    }
}
