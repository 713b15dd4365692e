// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use holofringe::constants::{Backend, EncodingScheme, Passband, SignalLocation, SlmType};

#[test]
fn test_scheme_ids_follow_all_order() {
    for (id, scheme) in EncodingScheme::ALL.iter().enumerate() {
        assert_eq!(EncodingScheme::from_id(id as u32).unwrap(), *scheme);
    }
    assert!(EncodingScheme::from_id(9).is_err());
}

#[test]
fn test_scheme_names_round_trip_through_from_str() {
    for scheme in EncodingScheme::ALL {
        let parsed: EncodingScheme = scheme.name().parse().unwrap();
        assert_eq!(parsed, scheme);
    }
}

#[test]
fn test_scheme_aliases() {
    assert_eq!(
        "SSB".parse::<EncodingScheme>().unwrap(),
        EncodingScheme::SingleSideBand
    );
    assert_eq!(
        "off-ssb".parse::<EncodingScheme>().unwrap(),
        EncodingScheme::OffAxisSingleSideBand
    );
    assert_eq!(
        "4".parse::<EncodingScheme>().unwrap(),
        EncodingScheme::Burckhardt
    );
    assert!("hilbert".parse::<EncodingScheme>().is_err());
}

#[test]
fn test_width_factors() {
    assert_eq!(EncodingScheme::Burckhardt.width_factor(), 3);
    assert_eq!(EncodingScheme::TwoPhase.width_factor(), 2);
    for scheme in EncodingScheme::ALL {
        if !matches!(scheme, EncodingScheme::Burckhardt | EncodingScheme::TwoPhase) {
            assert_eq!(scheme.width_factor(), 1, "{}", scheme.display_name());
        }
    }
}

#[test]
fn test_only_side_band_schemes_need_passband() {
    let needing: Vec<_> = EncodingScheme::ALL
        .into_iter()
        .filter(|s| s.needs_passband())
        .collect();
    assert_eq!(
        needing,
        vec![
            EncodingScheme::SingleSideBand,
            EncodingScheme::OffAxisSingleSideBand
        ]
    );
}

#[test]
fn test_passband_and_backend_parsing() {
    for band in Passband::ALL {
        let parsed: Passband = band.display_name().to_uppercase().parse().unwrap();
        assert_eq!(parsed, band);
    }
    assert_eq!("GPU".parse::<Backend>().unwrap(), Backend::Gpu);
    assert_eq!(Backend::default(), Backend::Cpu);
    assert_eq!("phase".parse::<SlmType>().unwrap(), SlmType::Phase);
    assert!("mirror".parse::<SlmType>().is_err());
}

#[test]
fn test_signal_location_components_are_signs() {
    let location = SignalLocation::new(3, -100);
    assert_eq!((location.x, location.y), (1, -1));
    assert_eq!(SignalLocation::new(0, 2), SignalLocation::new(0, 1));

    let raw = SignalLocation { x: -7, y: 0 };
    assert_eq!(raw.normalized(), SignalLocation::new(-1, 0));
}
