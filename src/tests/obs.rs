#[cfg(test)]
mod test {
    use crate::{
        examine,
        prelude::{Constellation, Duration, MarkerType, Observables, Warning, SV},
        tests::toolkit::{generic_observation_test, has_warning, test_resource},
    };

    #[test]
    fn v2_ajac3550_21o() {
        let path = test_resource(&["OBS", "V2", "AJAC3550.21O"]);
        let report = examine(&path).unwrap();

        generic_observation_test(
            &report,
            "2.11",
            "AJAC",
            12,
            1,
            "2021-12-21T00:00:00 GPST",
            "2021-12-21T00:05:30 GPST",
            &[Constellation::GPS, Constellation::Glonass],
        );

        assert!(report.warnings().is_empty(), "{:?}", report.warnings());
        assert!(report.source().compression.is_empty());

        let header = report.header();
        assert_eq!(header.marker_number.as_deref(), Some("10077M005"));
        assert_eq!(header.observer.as_deref(), Some("AUTOMATIC"));
        assert_eq!(header.agency.as_deref(), Some("IGN"));
        assert_eq!(header.program.as_deref(), Some("teqc  2019Feb25"));

        let receiver = header.receiver.as_ref().unwrap();
        assert_eq!(receiver.model, "LEICA GR50");
        assert_eq!(receiver.sn, "1830139");
        assert_eq!(receiver.firmware, "4.31/7.403");

        let antenna = header.antenna.as_ref().unwrap();
        assert_eq!(antenna.model, "TRM57971.00     NONE");
        assert_eq!(antenna.sn, "4611118324");
        assert_eq!(antenna.height, Some(0.1));

        match &header.observables {
            Observables::Shared(codes) => {
                assert_eq!(
                    codes,
                    &["L1", "L2", "C1", "C2", "P1", "P2", "D1", "D2", "S1", "S2"]
                        .map(String::from)
                        .to_vec()
                );
            },
            _ => panic!("RINEX2 observables are shared"),
        }

        assert_eq!(report.declared_interval(), Some(Duration::from_seconds(30.0)));
        assert_eq!(report.calculated_interval(), Some(Duration::from_seconds(30.0)));
        assert_eq!(report.duration(), Some(Duration::from_seconds(330.0)));

        assert_eq!(report.vehicles().len(), 14);
        assert!(report.vehicles().contains(&SV::new(Constellation::Glonass, 24)));
        assert_eq!(report.summary().max_satellites, 14);

        let position = report.position().unwrap();
        assert!((position.latitude_ddeg - 41.927454533).abs() < 1.0E-6);
        assert!((position.longitude_ddeg - 8.762610979).abs() < 1.0E-6);
        assert!((position.height_m - 98.7910).abs() < 1.0E-2);
    }

    #[test]
    fn v2_mism3650_99o() {
        let path = test_resource(&["OBS", "V2", "MISM3650.99O"]);
        let report = examine(&path).unwrap();

        generic_observation_test(
            &report,
            "2.10",
            "MISM",
            8,
            0,
            "1999-12-31T23:58:15 GPST",
            "2000-01-01T00:00:00 GPST",
            &[Constellation::GPS],
        );

        // declared 30s, spaced by 15s
        assert_eq!(
            report.warnings(),
            &[Warning::IntervalMismatch {
                declared: Duration::from_seconds(30.0),
                calculated: Duration::from_seconds(15.0),
            }]
        );
        assert_eq!(report.calculated_interval(), Some(Duration::from_seconds(15.0)));
        assert_eq!(report.duration(), Some(Duration::from_seconds(105.0)));

        // null position is no position
        assert!(report.header().approx_position.is_none());
        assert!(report.position().is_none());

        // blank system letter
        assert!(report.vehicles().contains(&SV::new(Constellation::GPS, 5)));
        assert_eq!(report.vehicles().len(), 4);

        let antenna = report.header().antenna.as_ref().unwrap();
        assert_eq!(antenna.height, Some(1.234));
    }

    #[test]
    fn v3_esbc00dnk_r_2021() {
        let path = test_resource(&["OBS", "V3", "ESBC00DNK_R_20213550000_01H_30S_MO.rnx"]);
        let report = examine(&path).unwrap();

        generic_observation_test(
            &report,
            "3.04",
            "ESBC00DNK",
            12,
            0,
            "2021-12-21T00:00:00 GPST",
            "2021-12-21T00:05:30 GPST",
            &[
                Constellation::GPS,
                Constellation::Glonass,
                Constellation::Galileo,
            ],
        );
        assert!(report.warnings().is_empty(), "{:?}", report.warnings());

        let header = report.header();
        assert_eq!(header.marker_type, Some(MarkerType::Geodetic));
        assert_eq!(header.signal_strength_unit.as_deref(), Some("DBHZ"));
        assert_eq!(header.leap.map(|leap| leap.leap), Some(18));

        match &header.observables {
            Observables::PerSystem(map) => {
                assert_eq!(map.get(&Constellation::GPS).map(|c| c.len()), Some(14));
                assert_eq!(map.get(&Constellation::Glonass).map(|c| c.len()), Some(4));
                assert_eq!(
                    map.get(&Constellation::Galileo).cloned(),
                    Some(["C1C", "L1C", "C5Q", "L5Q"].map(String::from).to_vec())
                );
            },
            _ => panic!("RINEX3 observables are per system"),
        }

        assert_eq!(report.vehicles().len(), 11);
        assert_eq!(report.summary().max_satellites, 11);
        assert_eq!(report.observed_constellations(), report.declared_constellations());

        let position = report.position().unwrap();
        assert!((position.latitude_ddeg - 55.493562765).abs() < 1.0E-6);
        assert!((position.longitude_ddeg - 8.456821389).abs() < 1.0E-6);
        assert!((position.height_m - 59.4765).abs() < 1.0E-2);
    }

    #[test]
    fn v3_mini00xxx_r_2022() {
        let path = test_resource(&["OBS", "V3", "MINI00XXX_R_20220010000_01H_30S_MO.rnx"]);
        let report = examine(&path).unwrap();

        generic_observation_test(
            &report,
            "3.02",
            "MINI",
            3,
            0,
            "2022-01-01T00:00:00 GPST",
            "2022-01-01T00:01:00 GPST",
            &[Constellation::GPS, Constellation::Glonass],
        );

        assert!(report.declared_interval().is_none());
        assert_eq!(report.calculated_interval(), Some(Duration::from_seconds(30.0)));
        assert!(report.position().is_none());
        assert!(!has_warning(&report, |w| matches!(
            w,
            Warning::IntervalMismatch { .. }
        )));
    }
}
