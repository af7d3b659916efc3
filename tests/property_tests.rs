use proptest::prelude::*;
use smsmodem::domain::config::{Validation, BAUD_RATES};
use smsmodem::infrastructure::serial::{device_map, PortEntry};
use smsmodem::{encode_message, ModemConfig};

fn decode(encoded: &str) -> String {
    let units: Vec<u16> = encoded
        .as_bytes()
        .chunks(4)
        .map(|group| {
            let digits = std::str::from_utf8(group).unwrap();
            u16::from_str_radix(digits, 16).unwrap()
        })
        .collect();
    String::from_utf16(&units).unwrap()
}

proptest! {
    #[test]
    fn encoding_round_trips(text in "\\PC{1,40}") {
        prop_assume!(!text.trim().is_empty());

        let encoded = encode_message(&text).unwrap();
        let encoded = encoded.as_str();

        prop_assert_eq!(encoded.len(), text.encode_utf16().count() * 4);
        prop_assert!(encoded.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        prop_assert_eq!(decode(encoded), text);
    }

    #[test]
    fn blank_text_is_refused(text in "[ \\t\\r\\n]{0,10}") {
        prop_assert!(encode_message(&text).is_err());
    }

    #[test]
    fn invalid_baud_rate_keeps_previous(baud in any::<i64>()) {
        prop_assume!(!BAUD_RATES.iter().any(|&rate| i64::from(rate) == baud));

        let mut config = ModemConfig::new("/dev/ttyUSB0", 9600, 1);
        let outcome = config.set_baud_rate(baud);

        prop_assert!(matches!(outcome, Validation::Invalid(_)));
        prop_assert_eq!(config.baud_rate(), 9600);
    }

    #[test]
    fn invalid_timeout_keeps_previous(timeout in prop_oneof![..=0i64, 61i64..]) {
        let mut config = ModemConfig::new("/dev/ttyUSB0", 9600, 30);
        let outcome = config.set_timeout(timeout);

        prop_assert!(!outcome.is_valid());
        prop_assert_eq!(config.timeout_secs(), 30);
    }

    #[test]
    fn device_map_is_sorted(
        mut entries in prop::collection::vec(
            ("/dev/tty[A-Z]{3}[0-9]", "[a-z]{1,5}", "[A-Z0-9]{1,5}"),
            1..12,
        )
    ) {
        let ports: Vec<PortEntry> = entries
            .iter()
            .map(|(port, model, hwid)| PortEntry::new(port.clone(), model.clone(), hwid.clone()))
            .collect();
        let devices = device_map(ports).unwrap();

        entries.sort();
        let mut expected: Vec<String> = entries.iter().map(|(port, _, _)| port.clone()).collect();
        expected.dedup();

        let keys: Vec<String> = devices.keys().cloned().collect();
        prop_assert_eq!(keys, expected);

        // The last sorted entry for a port wins
        for (port, model, hwid) in &entries {
            let later = entries.iter().filter(|(p, _, _)| p == port).last().unwrap();
            if (port, model, hwid) == (&later.0, &later.1, &later.2) {
                prop_assert_eq!(&devices[port].model, model);
                prop_assert_eq!(&devices[port].hwid, hwid);
            }
        }
    }
}
