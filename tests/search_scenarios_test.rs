use chrono::{NaiveDate, NaiveDateTime};
use community_directory::app::cards::render_list;
use community_directory::core::dataset::parse_services;
use community_directory::domain::model::GeoPoint;
use community_directory::{DirectoryBrowser, FixedLocation, RenderOutcome};

const DATASET: &str = r#"[
  {
    "name": "Upper Room Mission",
    "description": "Hot meals and Food Bank hampers",
    "categories": ["Food"],
    "eligibility": ["Anyone"],
    "address": "2500 34 St, Vernon",
    "lat": 50.2655, "lng": -119.2723,
    "hours": {"mon": "09:00-17:00", "tue": "09:00-17:00", "sun": "closed"}
  },
  {
    "name": "Cold Weather Shelter",
    "description": "Overnight beds",
    "categories": ["Shelter"],
    "address": "3100 30 Ave, Vernon",
    "lat": 50.2676, "lng": -119.2720,
    "hours": {"mon": "21:00-07:00"}
  },
  {
    "name": "Kelowna Legal Clinic",
    "description": "Free advice",
    "categories": ["Legal"],
    "lat": 49.8880, "lng": -119.4960,
    "hours": {"mon": "closed"}
  },
  {
    "name": "Crisis Line",
    "description": "24/7 phone support",
    "categories": ["Health", "Crisis"],
    "phone": "1-888-353-2273",
    "hours": {"mon": "00:00-00:00"}
  }
]"#;

fn monday_at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn loaded_browser() -> DirectoryBrowser {
    let mut browser = DirectoryBrowser::new();
    browser.replace_dataset(parse_services(DATASET.as_bytes()).unwrap());
    browser
}

fn results(browser: &DirectoryBrowser, now: NaiveDateTime) -> Vec<String> {
    match browser.render(&now) {
        RenderOutcome::Results(views) => views.into_iter().map(|v| v.record.name).collect(),
        RenderOutcome::NoData => panic!("dataset should be loaded"),
    }
}

#[test]
fn test_monday_morning_without_location() {
    let browser = loaded_browser();
    assert_eq!(
        results(&browser, monday_at(10, 0)),
        vec![
            "Crisis Line",
            "Upper Room Mission",
            "Cold Weather Shelter",
            "Kelowna Legal Clinic"
        ]
    );
}

#[test]
fn test_open_now_late_evening() {
    let mut browser = loaded_browser();
    browser.set_open_now_only(true);
    assert_eq!(
        results(&browser, monday_at(22, 30)),
        vec!["Cold Weather Shelter", "Crisis Line"]
    );
}

#[test]
fn test_food_query_and_category() {
    let mut browser = loaded_browser();
    browser.set_text("food");
    assert_eq!(results(&browser, monday_at(10, 0)), vec!["Upper Room Mission"]);

    browser.set_text("");
    browser.set_category(Some("Crisis".to_string()));
    assert_eq!(results(&browser, monday_at(10, 0)), vec!["Crisis Line"]);

    browser.set_category(Some("all".to_string()));
    assert_eq!(results(&browser, monday_at(10, 0)).len(), 4);
}

#[tokio::test]
async fn test_near_vernon_ranks_by_distance_and_applies_radius() {
    let mut browser = loaded_browser();
    browser.set_max_km(10.0);
    browser
        .locate(&FixedLocation(Some(GeoPoint::new(50.2670, -119.2720))))
        .await
        .unwrap();

    let now = monday_at(10, 0);
    // Kelowna is ~45 km away; the crisis line has no coordinates and stays.
    // Distance only orders the two located records.
    assert_eq!(
        results(&browser, now),
        vec!["Crisis Line", "Cold Weather Shelter", "Upper Room Mission"]
    );

    let RenderOutcome::Results(views) = browser.render(&now) else {
        panic!("dataset should be loaded");
    };
    let text = render_list(&views, &now);
    assert!(text.contains("Upper Room Mission\n  [Open] [0.2 km] [Food]"));
    assert!(text.contains("Hours today: 21:00-07:00"));
}

#[tokio::test]
async fn test_open_service_without_coordinates_outranks_closed_nearby() {
    let mut browser = DirectoryBrowser::new();
    browser.replace_dataset(
        parse_services(
            br#"[
              {"name": "Closed Near", "lat": 50.2671, "lng": -119.2720, "hours": {"mon": "closed"}},
              {"name": "Open Nowhere", "hours": {"mon": "09:00-17:00"}}
            ]"#,
        )
        .unwrap(),
    );
    browser
        .locate(&FixedLocation(Some(GeoPoint::new(50.2670, -119.2720))))
        .await
        .unwrap();

    assert_eq!(
        results(&browser, monday_at(10, 0)),
        vec!["Open Nowhere", "Closed Near"]
    );
}

#[test]
fn test_unmatched_filters_render_message() {
    let mut browser = loaded_browser();
    browser.set_text("veterinary");
    let now = monday_at(10, 0);
    let RenderOutcome::Results(views) = browser.render(&now) else {
        panic!("dataset should be loaded");
    };
    assert!(views.is_empty());
    assert_eq!(render_list(&views, &now), "No services match your filters.\n");
}
