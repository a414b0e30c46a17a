//! Text rendering of a [Report]
use std::fmt::Write;

use itertools::Itertools;

use rinex_examiner::{
    constellation::{long_name, normalize},
    prelude::{Observables, Report, Warning},
};

fn or_unknown(s: &str) -> &str {
    if s.trim().is_empty() {
        "unknown"
    } else {
        s
    }
}

fn or_undeclared(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("unknown")
}

fn file_info(report: &Report, out: &mut String) -> std::fmt::Result {
    let source = report.source();
    let header = report.header();
    writeln!(out, "FILE")?;
    writeln!(out, "  name        : {}", source.name)?;
    if source.compression.is_empty() {
        writeln!(out, "  compression : none")?;
    } else {
        writeln!(
            out,
            "  compression : {}",
            source.compression.iter().join(" + ")
        )?;
    }
    writeln!(out, "  version     : {}", header.version)?;
    writeln!(out, "  type        : {}", header.rinex_type)?;
    writeln!(out, "  program     : {}", or_undeclared(&header.program))?;
    writeln!(out, "  run by      : {}", or_undeclared(&header.run_by))?;
    writeln!(out, "  date        : {}", or_undeclared(&header.date))
}

fn survey_info(report: &Report, out: &mut String) -> std::fmt::Result {
    let header = report.header();
    writeln!(out, "SURVEY")?;
    writeln!(out, "  marker      : {}", or_undeclared(&header.marker_name))?;
    if let Some(number) = &header.marker_number {
        writeln!(out, "  number      : {}", number)?;
    }
    if let Some(marker_type) = &header.marker_type {
        writeln!(out, "  marker type : {}", marker_type)?;
    }
    writeln!(out, "  observer    : {}", or_undeclared(&header.observer))?;
    writeln!(out, "  agency      : {}", or_undeclared(&header.agency))?;
    match &header.receiver {
        Some(rcvr) => writeln!(
            out,
            "  receiver    : {} (sn: {}, firmware: {})",
            or_unknown(&rcvr.model),
            or_unknown(&rcvr.sn),
            or_unknown(&rcvr.firmware)
        )?,
        None => writeln!(out, "  receiver    : unknown")?,
    }
    match &header.antenna {
        Some(ant) => {
            writeln!(
                out,
                "  antenna     : {} (sn: {})",
                or_unknown(&ant.model),
                or_unknown(&ant.sn)
            )?;
            if let Some(h) = ant.height {
                writeln!(out, "  ant. height : {:.4} m", h)?;
            }
            if let (Some(e), Some(n)) = (ant.eastern, ant.northern) {
                writeln!(out, "  ant. offset : east {:.4} m, north {:.4} m", e, n)?;
            }
        },
        None => writeln!(out, "  antenna     : unknown")?,
    }
    Ok(())
}

fn position(report: &Report, out: &mut String) -> std::fmt::Result {
    writeln!(out, "STATION POSITION")?;
    match (report.header().approx_position, report.position()) {
        (Some((x, y, z)), Some(geo)) => {
            writeln!(out, "  ECEF (m)    : x={:.4} y={:.4} z={:.4}", x, y, z)?;
            writeln!(out, "  latitude    : {:.9}°", geo.latitude_ddeg)?;
            writeln!(out, "  longitude   : {:.9}°", geo.longitude_ddeg)?;
            writeln!(out, "  height      : {:.4} m (WGS84 ellipsoid)", geo.height_m)?;
            if geo.approximate {
                writeln!(
                    out,
                    "  note        : approximate position, as declared in the header"
                )?;
            }
            Ok(())
        },
        _ => writeln!(out, "  not available"),
    }
}

fn time_info(report: &Report, out: &mut String) -> std::fmt::Result {
    writeln!(out, "TIME")?;
    match report.first_epoch() {
        Some(t) => writeln!(out, "  first epoch : {}", t)?,
        None => writeln!(out, "  first epoch : none")?,
    }
    match report.last_epoch() {
        Some(t) => writeln!(out, "  last epoch  : {}", t)?,
        None => writeln!(out, "  last epoch  : none")?,
    }
    if let Some(duration) = report.duration() {
        writeln!(out, "  duration    : {}", duration)?;
    }
    writeln!(out, "  epochs      : {}", report.epochs())?;
    if report.events() > 0 {
        writeln!(out, "  events      : {}", report.events())?;
    }

    let declared = report.declared_interval();
    let calculated = report.calculated_interval();
    match declared {
        Some(dt) => writeln!(out, "  declared interval   : {}", dt)?,
        None => writeln!(out, "  declared interval   : not declared")?,
    }
    match calculated {
        Some(dt) => writeln!(out, "  calculated interval : {}", dt)?,
        None => writeln!(out, "  calculated interval : not enough epochs")?,
    }
    if let (Some(declared), Some(calculated)) = (declared, calculated) {
        if declared != calculated {
            writeln!(
                out,
                "  note        : header interval differs from the data, this is common."
            )?;
            writeln!(
                out,
                "                the calculated interval ({}) is the one to trust.",
                calculated
            )?;
        }
    }
    Ok(())
}

fn constellations(report: &Report, out: &mut String) -> std::fmt::Result {
    writeln!(out, "CONSTELLATIONS")?;
    if report.constellations().is_empty() {
        return writeln!(out, "  none");
    }
    let observables = &report.header().observables;
    for constellation in report.constellations() {
        let vehicles = report
            .vehicles()
            .iter()
            .filter(|sv| normalize(sv.constellation) == *constellation)
            .count();
        write!(
            out,
            "  {:<12}: {} vehicle(s)",
            long_name(*constellation),
            vehicles
        )?;
        match observables.codes(*constellation) {
            Some(codes) => writeln!(out, ", {} observation type(s)", codes.len())?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

fn observables(report: &Report, out: &mut String) -> std::fmt::Result {
    writeln!(out, "OBSERVATION TYPES")?;
    let observables = &report.header().observables;
    if observables.is_empty() {
        return writeln!(out, "  none declared");
    }
    match observables {
        Observables::Shared(codes) => writeln!(out, "  all systems : {}", codes.join(" ")),
        Observables::PerSystem(map) => {
            for (constellation, codes) in map {
                writeln!(
                    out,
                    "  {:<12}: {}",
                    long_name(*constellation),
                    codes.join(" ")
                )?;
            }
            Ok(())
        },
    }
}

fn warnings(warnings: &[Warning], out: &mut String) -> std::fmt::Result {
    writeln!(out, "WARNINGS")?;
    if warnings.is_empty() {
        return writeln!(out, "  none");
    }
    for warning in warnings {
        writeln!(out, "  - {}", warning)?;
    }
    Ok(())
}

/// Renders the report field by field
pub fn render(report: &Report) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    file_info(report, &mut out)?;
    survey_info(report, &mut out)?;
    position(report, &mut out)?;
    time_info(report, &mut out)?;
    constellations(report, &mut out)?;
    observables(report, &mut out)?;
    warnings(report.warnings(), &mut out)?;
    Ok(out)
}
