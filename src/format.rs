//! Version and file type classification
use crate::{
    column,
    constellation::from_letter,
    dialect::{Parser, Version2Parser, Version3Parser},
    error::{Error, FormatError},
    header::split_record,
    prelude::{Constellation, RinexType, Version},
    reader::SourceStream,
};

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Format] is the classification of a RINEX stream,
/// obtained from its very first line.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Format {
    pub version: Version,
    pub rinex_type: RinexType,
    /// Satellite system declared next to the file type.
    /// RINEX2 observations may leave it blank, meaning GPS.
    pub constellation: Constellation,
}

impl Format {
    /// Classifies the stream from its "RINEX VERSION / TYPE" line,
    /// which is the only line consumed.
    pub fn detect(stream: &mut SourceStream) -> Result<Self, Error> {
        loop {
            let line = match stream.next_line()? {
                Some(line) => line,
                None => return Err(FormatError::NotRinex.into()),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Self::from_version_line(&line);
        }
    }

    pub(crate) fn from_version_line(line: &str) -> Result<Self, Error> {
        let (content, label) = split_record(line);
        if label != "RINEX VERSION / TYPE" {
            return Err(FormatError::NotRinex.into());
        }

        let version = Version::from_str(column(content, 0, 20))
            .map_err(|_| Error::UnsupportedFormat(FormatError::NotRinex))?;
        if !version.is_supported() {
            return Err(FormatError::UnsupportedVersion(version).into());
        }

        let code = column(content, 20, 21).chars().next().unwrap_or(' ');
        let rinex_type = RinexType::from_code(code)
            .map_err(|_| Error::UnsupportedFormat(FormatError::NotRinex))?;
        if rinex_type != RinexType::ObservationData {
            return Err(FormatError::NotObservation(rinex_type).into());
        }

        let constellation = match column(content, 40, 41).chars().next() {
            None | Some(' ') => Constellation::GPS,
            Some('M') | Some('m') => Constellation::Mixed,
            Some(c) => from_letter(c).unwrap_or(Constellation::Mixed),
        };

        #[cfg(feature = "log")]
        log::debug!("detected {} {} ({:?})", rinex_type, version, constellation);

        Ok(Self {
            version,
            rinex_type,
            constellation,
        })
    }

    /// Selects the revision specific [Parser]
    pub fn parser(&self) -> Parser {
        match self.version.major {
            2 => Parser::V2(Version2Parser::default()),
            _ => Parser::V3(Version3Parser::default()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn detect(content: &'static str) -> Result<Format, Error> {
        let mut stream = SourceStream::new(Box::new(Cursor::new(content.as_bytes())));
        Format::detect(&mut stream)
    }

    #[test]
    fn observation_files() {
        let format = detect(
            "     3.04           OBSERVATION DATA    M                   RINEX VERSION / TYPE\n",
        )
        .unwrap();
        assert_eq!(format.version, Version::new(3, 4));
        assert_eq!(format.rinex_type, RinexType::ObservationData);
        assert_eq!(format.constellation, Constellation::Mixed);
        assert!(matches!(format.parser(), Parser::V3(_)));

        let format = detect(
            "\n     2.10           OBSERVATION DATA                        RINEX VERSION / TYPE\n",
        )
        .unwrap();
        assert_eq!(format.version, Version::new(2, 10));
        assert_eq!(format.constellation, Constellation::GPS);
        assert!(matches!(format.parser(), Parser::V2(_)));
    }

    #[test]
    fn rejections() {
        let err = detect(
            "     3.04           N: GNSS NAV DATA    M: MIXED            RINEX VERSION / TYPE\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedFormat(FormatError::NotObservation(RinexType::NavigationData))
        ));

        let err = detect(
            "     4.00           OBSERVATION DATA    M                   RINEX VERSION / TYPE\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedFormat(FormatError::UnsupportedVersion(_))
        ));

        let err = detect("hello world\n").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(FormatError::NotRinex)));

        let err = detect("").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(FormatError::NotRinex)));
    }
}
