#[cfg(test)]
mod test {
    use crate::{
        prelude::{Error, Examiner, FormatError, RinexType, Version, Warning},
        tests::toolkit::{has_warning, read_resource, test_resource},
    };

    /// Keeps the first `n` lines
    fn head(content: &[u8], n: usize) -> Vec<u8> {
        let text = String::from_utf8(content.to_vec()).unwrap();
        let mut lines = text.lines().take(n).collect::<Vec<_>>().join("\n");
        lines.push('\n');
        lines.into_bytes()
    }

    /// Drops the last `n` lines
    fn drop_tail(content: &[u8], n: usize) -> Vec<u8> {
        let text = String::from_utf8(content.to_vec()).unwrap();
        let total = text.lines().count();
        head(content, total - n)
    }

    fn end_of_header(content: &[u8]) -> usize {
        let text = String::from_utf8(content.to_vec()).unwrap();
        text.lines()
            .position(|line| line.contains("END OF HEADER"))
            .unwrap()
            + 1
    }

    #[test]
    fn classification() {
        let examiner = Examiner::default();
        for (parts, version) in [
            (&["OBS", "V2", "AJAC3550.21O"][..], Version::new(2, 11)),
            (&["OBS", "V2", "MISM3650.99O"][..], Version::new(2, 10)),
            (
                &["OBS", "V3", "ESBC00DNK_R_20213550000_01H_30S_MO.rnx"][..],
                Version::new(3, 4),
            ),
        ] {
            let report = examiner.examine_file(test_resource(parts)).unwrap();
            assert_eq!(report.version(), version);
            assert_eq!(report.header().rinex_type, RinexType::ObservationData);
        }
    }

    #[test]
    fn navigation_rejected() {
        let path = test_resource(&["NAV", "V3", "BRDC00GOP_R_20210010000_01D_MN.rnx"]);
        match Examiner::default().examine_file(path) {
            Err(Error::UnsupportedFormat(FormatError::NotObservation(rinex_type))) => {
                assert_eq!(rinex_type, RinexType::NavigationData);
            },
            other => panic!("navigation file should be rejected, got {:?}", other),
        }
    }

    #[test]
    fn meteo_rejected() {
        let path = test_resource(&["MET", "V2", "abvi0010.15m"]);
        match Examiner::default().examine_file(path) {
            Err(Error::UnsupportedFormat(FormatError::NotObservation(rinex_type))) => {
                assert_eq!(rinex_type, RinexType::MeteoData);
            },
            other => panic!("meteo file should be rejected, got {:?}", other),
        }
    }

    #[test]
    fn not_rinex() {
        let examiner = Examiner::default();
        match examiner.examine_bytes("notes.txt", b"hello\nworld\n".to_vec()) {
            Err(Error::UnsupportedFormat(FormatError::NotRinex)) => {},
            other => panic!("unexpected {:?}", other),
        }
        match examiner.examine_bytes("empty.rnx", Vec::new()) {
            Err(Error::UnsupportedFormat(FormatError::NotRinex)) => {},
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unsupported_version() {
        let content = format!(
            "{:<60}{}\n{:<60}{}\n",
            "     4.00           OBSERVATION DATA    M",
            "RINEX VERSION / TYPE",
            "",
            "END OF HEADER"
        );
        match Examiner::default().examine_bytes("V4.rnx", content.into_bytes()) {
            Err(Error::UnsupportedFormat(FormatError::UnsupportedVersion(version))) => {
                assert_eq!(version.major, 4);
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn truncated_header() {
        let examiner = Examiner::default();
        for parts in [
            &["OBS", "V2", "AJAC3550.21O"][..],
            &["OBS", "V3", "ESBC00DNK_R_20213550000_01H_30S_MO.rnx"][..],
        ] {
            let content = read_resource(parts);
            let eoh = end_of_header(&content);

            // right after END OF HEADER: no body at all
            let truncated = head(&content, eoh);
            assert!(matches!(
                examiner.examine_bytes("truncated.rnx", truncated),
                Err(Error::TruncatedHeader)
            ));

            // END OF HEADER is missing
            let truncated = head(&content, eoh - 3);
            assert!(matches!(
                examiner.examine_bytes("truncated.rnx", truncated),
                Err(Error::TruncatedHeader)
            ));
        }
    }

    #[test]
    fn v2_truncated_body() {
        let content = read_resource(&["OBS", "V2", "AJAC3550.21O"]);
        let truncated = drop_tail(&content, 3);

        let report = Examiner::default()
            .examine_bytes("AJAC3550.21O", truncated)
            .unwrap();

        // last epoch is lost, all others remain
        assert_eq!(report.epochs(), 11);
        assert_eq!(report.events(), 1);
        assert!(has_warning(&report, |w| matches!(
            w,
            Warning::TruncatedBody { epoch: Some(_), .. }
        )));
    }

    #[test]
    fn v3_truncated_body() {
        let content = read_resource(&["OBS", "V3", "ESBC00DNK_R_20213550000_01H_30S_MO.rnx"]);
        let truncated = drop_tail(&content, 2);

        let report = Examiner::default()
            .examine_bytes("ESBC00DNK_R_20213550000_01H_30S_MO.rnx", truncated)
            .unwrap();

        assert_eq!(report.epochs(), 11);
        assert!(has_warning(&report, |w| matches!(
            w,
            Warning::TruncatedBody { .. }
        )));
        // truncation is not a header inconsistency
        assert!(!has_warning(&report, |w| matches!(
            w,
            Warning::IntervalMismatch { .. } | Warning::HeaderTimeMismatch { .. }
        )));
    }

    #[test]
    fn idempotence() {
        let path = test_resource(&["OBS", "V3", "ESBC00DNK_R_20213550000_01H_30S_MO.rnx"]);
        let before = std::fs::read(&path).unwrap();

        let examiner = Examiner::default();
        let first = examiner.examine_file(&path).unwrap();
        let second = examiner.examine_file(&path).unwrap();
        assert_eq!(first, second);

        #[cfg(feature = "serde")]
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        // read only
        let after = std::fs::read(&path).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn missing_file() {
        let path = test_resource(&["OBS", "V3", "DOES_NOT_EXIST.rnx"]);
        assert!(matches!(
            Examiner::default().examine_file(path),
            Err(Error::Io(_))
        ));
    }
}
