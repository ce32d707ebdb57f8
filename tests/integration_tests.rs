// Integration tests for Pharma Garde

use pharma_garde::core::{is_open, rank, Clock, FixedClock};
use pharma_garde::models::{
    DayKey, DistanceLimit, FilterCriteria, Pharmacy, PharmacyId, ReferencePosition, TimeWindow,
    WeeklySchedule,
};
use pharma_garde::services::{fallback_pharmacies, DatasetCache, PharmacyLoader, PharmacySource};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::io::Write;

fn create_test_pharmacy(id: u64, lat: f64, lon: f64, on_duty: bool, schedule: WeeklySchedule) -> Pharmacy {
    Pharmacy {
        id: PharmacyId::from(id),
        name: format!("Pharmacie {}", id),
        address: format!("{} quai de la Bourse", id),
        city: "Rouen".to_string(),
        postal_code: "76000".to_string(),
        latitude: lat,
        longitude: lon,
        phone: "02 35 00 00 00".to_string(),
        on_duty,
        schedule,
    }
}

fn business_hours() -> WeeklySchedule {
    WeeklySchedule::new()
        .with_weekdays(vec![
            TimeWindow::from_hm(9, 0, 12, 0),
            TimeWindow::from_hm(14, 0, 19, 0),
        ])
        .with_day(DayKey::Saturday, vec![TimeWindow::from_hm(9, 0, 12, 30)])
}

// Deterministic spread of pharmacies around Rouen
fn create_city(count: u64) -> Vec<Pharmacy> {
    (0..count)
        .map(|i| {
            let lat = 49.40 + ((i * 37) % 100) as f64 * 0.001;
            let lon = 1.05 + ((i * 53) % 100) as f64 * 0.001;
            create_test_pharmacy(i, lat, lon, i % 7 == 0, business_hours())
        })
        .collect()
}

fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn open_only() -> FilterCriteria {
    FilterCriteria {
        open_only: true,
        max_distance: DistanceLimit::Unlimited,
    }
}

#[test]
fn test_integration_fallback_fixture_always_returned() {
    let pharmacies = fallback_pharmacies();

    let mut instant = monday_at(0, 0) - Duration::days(1);
    for _ in 0..(7 * 24) {
        let result = rank(&pharmacies, None, &open_only(), instant);
        assert_eq!(result.pharmacies.len(), 1, "at {}", instant);
        assert_eq!(result.pharmacies[0].pharmacy.id, PharmacyId::from(1));
        instant += Duration::hours(1);
    }
}

#[test]
fn test_integration_on_duty_beats_closed_schedule() {
    let pharmacies = vec![
        create_test_pharmacy(1, 49.4431, 1.0993, false, business_hours()),
        create_test_pharmacy(2, 49.4500, 1.1000, true, WeeklySchedule::new()),
    ];

    // Monday 13:00 falls in the lunch break
    let result = rank(&pharmacies, None, &open_only(), monday_at(13, 0));

    assert_eq!(result.pharmacies.len(), 1);
    assert_eq!(result.pharmacies[0].pharmacy.id, PharmacyId::from(2));
}

#[test]
fn test_integration_open_only_never_returns_closed() {
    let pharmacies = create_city(60);
    let reference = Some(ReferencePosition::new(49.4431, 1.0993));

    for hour in 0..24 {
        let now = monday_at(hour, 30);
        let result = rank(&pharmacies, reference, &open_only(), now);

        assert!(result
            .pharmacies
            .iter()
            .all(|ranked| ranked.is_open && is_open(ranked.pharmacy, &now)));

        let expected_open = pharmacies.iter().filter(|p| is_open(p, &now)).count();
        assert_eq!(result.pharmacies.len(), expected_open);
    }
}

#[test]
fn test_integration_distance_limit_and_ordering() {
    let pharmacies = create_city(100);
    let reference = Some(ReferencePosition::new(49.4431, 1.0993));

    for max_km in [0.5, 1.0, 2.0, 5.0] {
        let criteria = FilterCriteria {
            open_only: false,
            max_distance: DistanceLimit::Km(max_km),
        };
        let result = rank(&pharmacies, reference, &criteria, monday_at(10, 0));

        let distances: Vec<f64> = result
            .pharmacies
            .iter()
            .map(|ranked| ranked.distance_km.unwrap())
            .collect();

        assert!(distances.iter().all(|d| *d <= max_km), "limit {} exceeded", max_km);
        assert!(distances.windows(2).all(|w| w[0] <= w[1]), "not sorted for {}", max_km);
        assert_eq!(result.total_candidates, 100);
    }
}

#[test]
fn test_integration_no_reference_preserves_order() {
    let pharmacies = create_city(40);
    let result = rank(&pharmacies, None, &open_only(), monday_at(10, 0));

    let returned: Vec<u64> = result
        .pharmacies
        .iter()
        .map(|ranked| match &ranked.pharmacy.id {
            PharmacyId::Numeric(id) => id.as_u64().unwrap(),
            PharmacyId::Text(_) => unreachable!(),
        })
        .collect();

    assert!(returned.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(returned.len(), 40);
}

#[test]
fn test_integration_input_is_not_mutated() {
    let pharmacies = create_city(20);
    let before = pharmacies.clone();

    let _ = rank(
        &pharmacies,
        Some(ReferencePosition::new(48.8566, 2.3522)),
        &FilterCriteria::default(),
        monday_at(10, 0),
    );

    assert_eq!(pharmacies, before);
}

#[test]
fn test_integration_fixed_clock_drives_ranking() {
    let pharmacies = vec![create_test_pharmacy(1, 49.4431, 1.0993, false, business_hours())];

    let morning = FixedClock(monday_at(10, 0));
    let evening = FixedClock(monday_at(21, 0));

    assert_eq!(rank(&pharmacies, None, &open_only(), morning.now()).pharmacies.len(), 1);
    assert!(rank(&pharmacies, None, &open_only(), evening.now()).pharmacies.is_empty());
}

#[test]
fn test_integration_file_source_to_ranking() {
    let json = r#"[
        {"id": "a", "nom": "Pharmacie A", "adresse": "1 rue A", "ville": "Rouen",
         "codePostal": "76000", "latitude": 49.4431, "longitude": 1.0993,
         "telephone": "x", "estDeGarde": false,
         "horaires": {"lundi": [{"ouverture": "08:30", "fermeture": "19:30"}]}},
        {"id": "b", "nom": "Pharmacie B", "adresse": "2 rue B", "ville": "Rouen",
         "codePostal": "76000", "latitude": 49.4300, "longitude": 1.0800,
         "telephone": "y", "estDeGarde": false,
         "horaires": {"lundi": [{"ouverture": "20:00", "fermeture": "08:00"}]}}
    ]"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let loader = PharmacyLoader::new(PharmacySource::File(file.path().to_path_buf()));
    let pharmacies = tokio_test::block_on(loader.try_load()).unwrap();
    assert_eq!(pharmacies.len(), 2);

    // The overnight window of B never matches
    let result = rank(&pharmacies, None, &open_only(), monday_at(22, 0));
    assert!(result.pharmacies.is_empty());

    let result = rank(&pharmacies, None, &open_only(), monday_at(19, 30));
    assert_eq!(result.pharmacies.len(), 1);
    assert_eq!(result.pharmacies[0].pharmacy.id.to_string(), "a");
}

#[tokio::test]
async fn test_integration_http_source_through_cache() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/data/pharmacies.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"id": 5, "nom": "Pharmacie du Port", "adresse": "Quai du Havre",
                 "ville": "Rouen", "codePostal": "76000", "latitude": 49.4400,
                 "longitude": 1.0850, "telephone": "z", "estDeGarde": true, "horaires": {}}]"#,
        )
        .expect(1)
        .create_async()
        .await;

    let loader = PharmacyLoader::new(PharmacySource::Http(format!(
        "{}/data/pharmacies.json",
        server.url()
    )));
    let cache = DatasetCache::new(loader, 60);

    let first = cache.get_or_load().await;
    let second = cache.get_or_load().await;

    assert_eq!(first.len(), 1);
    assert_eq!(second[0].name, "Pharmacie du Port");
    mock.assert_async().await;
}
