use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use rss_alerts::pubdate::{parse_pubdate, parse_reference_time, zone_abbreviation_offset};
use rss_alerts::{default_triggers, filter_stories, AlertError, Evaluate, Published, Story, TriggerConfig};
use std::io::Write;

const TRIGGER_FILE: &str = "
# trigger file used by the tests
t1,TITLE,election
t2,DESCRIPTION,Trump
t3,DESCRIPTION,Clinton
t4,AFTER,3 Oct 2016 17:00:10
t5,AND,t2,t3
t6,AND,t1,t4
t7,NOT,t6

ADD,t5,t6
";

fn story(guid: &str, title: &str, description: &str, published: chrono::DateTime<Utc>) -> Story {
    Story::new(guid, title, description, "", published)
}

#[test]
fn test_parse_trigger_file() {
    let triggers = TriggerConfig::default().parse(TRIGGER_FILE).unwrap();
    assert_eq!(triggers.len(), 2);

    let debate = story(
        "d",
        "Debate night",
        "Trump and Clinton meet on stage",
        Utc.with_ymd_and_hms(2016, 9, 26, 21, 0, 0).unwrap(),
    );
    let late_election = story(
        "e",
        "Election results are in",
        "",
        Utc.with_ymd_and_hms(2016, 11, 9, 6, 0, 0).unwrap(),
    );
    let early_election = story(
        "f",
        "Election season begins",
        "",
        Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap(),
    );

    assert!(triggers[0].evaluate(&debate).unwrap());
    assert!(!triggers[1].evaluate(&debate).unwrap());
    assert!(triggers[1].evaluate(&late_election).unwrap());

    let stories = vec![debate, late_election, early_election];
    let kept = filter_stories(&stories, &triggers).unwrap();
    let guids: Vec<&str> = kept.iter().map(|s| s.guid.as_str()).collect();
    assert_eq!(guids, vec!["d", "e"]);
}

#[test]
fn test_phrase_with_commas_is_rejoined() {
    let triggers = TriggerConfig::default()
        .parse("t1,TITLE,hello, world\nADD,t1")
        .unwrap();
    let s = story("h", "Hello world!", "", Utc::now());
    assert!(triggers[0].evaluate(&s).unwrap());
}

#[test]
fn test_kinds_are_case_insensitive_and_add_repeats() {
    let triggers = TriggerConfig::default()
        .parse("a,title,cat\nb,Or,a,a\nadd,a,b,a")
        .unwrap();
    assert_eq!(triggers.len(), 3);
}

#[test]
fn test_configuration_errors_carry_line_numbers() {
    let cases = [
        ("t1,TITLE,cat\nADD,t2", 2),
        ("t1,AND,t2,t3", 1),
        ("t1,TITLE,cat\nt1,TITLE,dog", 2),
        ("\n\nt1,BEFORE,not a date", 3),
        ("t1,SOUNDS_LIKE,cat", 1),
        ("t1,TITLE", 1),
        ("t1,TITLE,cat\nt2,NOT,t1,t1", 2),
        ("t1,TITLE,!!!", 1),
        ("ADD", 1),
    ];

    for (content, expected_line) in cases {
        match TriggerConfig::default().parse(content) {
            Err(AlertError::Configuration { line, .. }) => assert_eq!(line, expected_line, "{:?}", content),
            other => panic!("expected configuration error for {:?}, got {:?}", content, other),
        }
    }
}

#[test]
fn test_reference_offset_applies_to_time_triggers() {
    let est = FixedOffset::west_opt(5 * 3600).unwrap();
    let triggers = TriggerConfig::new(est)
        .parse("t1,BEFORE,1 Jun 2020 12:00:00\nADD,t1")
        .unwrap();

    // 12:00 EST is 17:00Z.
    let at_16z = story("a", "", "", Utc.with_ymd_and_hms(2020, 6, 1, 16, 0, 0).unwrap());
    let at_18z = story("b", "", "", Utc.with_ymd_and_hms(2020, 6, 1, 18, 0, 0).unwrap());
    assert!(triggers[0].evaluate(&at_16z).unwrap());
    assert!(!triggers[0].evaluate(&at_18z).unwrap());
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("rss-alerts-triggers-{}.txt", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(TRIGGER_FILE.as_bytes()).unwrap();
    }

    let triggers = TriggerConfig::default().load(&path).unwrap();
    assert_eq!(triggers.len(), 2);
    std::fs::remove_file(&path).ok();

    assert!(matches!(TriggerConfig::default().load(&path), Err(AlertError::Io(_))));
}

#[test]
fn test_default_triggers_match_title_or_description() {
    let triggers = default_triggers().unwrap();
    let in_title = story("t", "Trump signs order", "", Utc::now());
    let in_description = story("d", "Weather", "Trump mentioned", Utc::now());
    let neither = story("n", "Weather", "Sunny", Utc::now());

    let kept = filter_stories(&[in_title, in_description, neither], &triggers).unwrap();
    assert_eq!(kept.len(), 2);
}

#[test]
fn test_pubdate_with_numeric_offset() {
    let parsed = parse_pubdate("Sat, 06 Jun 2020 13:03:47 -0400").unwrap();
    let expected = FixedOffset::west_opt(4 * 3600)
        .unwrap()
        .with_ymd_and_hms(2020, 6, 6, 13, 3, 47)
        .unwrap();
    assert_eq!(parsed, Published::Zoned(expected));
}

#[test]
fn test_pubdate_with_named_zone() {
    let gmt = parse_pubdate("Sat, 06 Jun 2020 13:03:47 GMT").unwrap();
    assert_eq!(gmt.to_utc(FixedOffset::east_opt(0).unwrap()), Utc.with_ymd_and_hms(2020, 6, 6, 13, 3, 47).unwrap());

    let est = parse_pubdate("Sat, 06 Jun 2020 13:03:47 EST").unwrap();
    assert!(!est.is_floating());
    assert_eq!(est.to_utc(FixedOffset::east_opt(0).unwrap()), Utc.with_ymd_and_hms(2020, 6, 6, 18, 3, 47).unwrap());

    let no_weekday = parse_pubdate("06 Jun 2020 13:03:47 PDT").unwrap();
    assert_eq!(no_weekday.to_utc(FixedOffset::east_opt(0).unwrap()), Utc.with_ymd_and_hms(2020, 6, 6, 20, 3, 47).unwrap());
}

#[test]
fn test_pubdate_unknown_zone_stays_floating() {
    let parsed = parse_pubdate("Sat, 06 Jun 2020 13:03:47 XYZT").unwrap();
    let naive = NaiveDate::from_ymd_opt(2020, 6, 6).unwrap().and_hms_opt(13, 3, 47).unwrap();
    assert_eq!(parsed, Published::Floating(naive));
}

#[test]
fn test_pubdate_rfc3339_and_garbage() {
    assert!(matches!(parse_pubdate("2020-06-01T10:00:00+02:00"), Some(Published::Zoned(_))));
    assert!(parse_pubdate("").is_none());
    assert!(parse_pubdate("yesterday-ish").is_none());
    assert_eq!(zone_abbreviation_offset("cdt"), FixedOffset::west_opt(5 * 3600));
    assert!(zone_abbreviation_offset("CET").is_none());
}

#[test]
fn test_reference_time_format() {
    let utc = FixedOffset::east_opt(0).unwrap();
    assert_eq!(
        parse_reference_time("3 Oct 2016 17:00:10", utc).unwrap(),
        Utc.with_ymd_and_hms(2016, 10, 3, 17, 0, 10).unwrap()
    );
    assert!(matches!(
        parse_reference_time("2016-10-03", utc),
        Err(AlertError::Configuration { .. })
    ));
}

#[test]
fn test_pubdate_without_seconds() {
    let utc = FixedOffset::east_opt(0).unwrap();
    let expected = Utc.with_ymd_and_hms(2020, 6, 1, 10, 0, 0).unwrap();

    let gmt = parse_pubdate("Mon, 01 Jun 2020 10:00 GMT").unwrap();
    assert!(!gmt.is_floating());
    assert_eq!(gmt.to_utc(utc), expected);

    let numeric = parse_pubdate("01 Jun 2020 06:00 -0400").unwrap();
    assert_eq!(numeric.to_utc(utc), expected);

    let naive = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
    assert_eq!(parse_pubdate("1 Jun 2020 10:00"), Some(Published::Floating(naive)));
}
