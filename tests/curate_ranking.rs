// tests/curate_ranking.rs
use chrono::NaiveDate;
use stream_catalog::{publish, Catalog, CatalogEntry, ChannelProfile, CurateOptions};

fn entry(channel: &str, url: &str, ymd: (i32, u32, u32)) -> CatalogEntry {
    CatalogEntry {
        url: url.to_string(),
        channel: channel.to_string(),
        keyword: channel.to_string(),
        last_seen: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap(),
    }
}

fn catalog(entries: Vec<CatalogEntry>) -> Catalog {
    entries.into_iter().map(|e| (e.url.clone(), e)).collect()
}

#[test]
fn preferred_provider_outranks_newer_entry() {
    let cat = catalog(vec![
        entry("ViuTV", "http://plain.example/a.m3u8", (2024, 6, 1)),
        entry("ViuTV", "http://cdn.jdshipin.com/b.m3u8", (2024, 1, 1)),
    ]);
    let items = publish(
        &cat,
        &[ChannelProfile::new("VIU", "VIUTV").max_count(1)],
        &CurateOptions::default(),
    );
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].url, "http://cdn.jdshipin.com/b.m3u8");
}

#[test]
fn cap_keeps_top_ranked_in_order() {
    let mut entries = Vec::new();
    for day in 1..=8u32 {
        entries.push(entry("翡翠台", &format!("http://s{day}/live"), (2024, 6, day)));
    }
    // one preferred, older than everything else
    entries.push(entry("翡翠台", "http://jdshipin/old", (2024, 5, 1)));
    let cat = catalog(entries);

    let items = publish(
        &cat,
        &[ChannelProfile::new("翡翠台", "翡翠台").max_count(3)],
        &CurateOptions::default(),
    );
    let urls: Vec<_> = items.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, ["http://jdshipin/old", "http://s8/live", "http://s7/live"]);
}

#[test]
fn cap_with_eight_plain_matches() {
    let cat = catalog(
        (1..=8u32)
            .map(|d| entry("TVB Plus", &format!("http://p{d}"), (2024, 3, d)))
            .collect(),
    );
    let items = publish(
        &cat,
        &[ChannelProfile::new("tvb plus", "TVBPlus").max_count(3)],
        &CurateOptions::default(),
    );
    let urls: Vec<_> = items.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, ["http://p8", "http://p7", "http://p6"]);
}

#[test]
fn exclusion_keeps_viu_six_out() {
    let cat = catalog(vec![
        entry("VIU SIX", "http://a", (2024, 6, 2)),
        entry("viu 6", "http://b", (2024, 6, 2)),
        entry("ViuTV", "http://c", (2024, 6, 1)),
    ]);
    let profile = ChannelProfile::new("VIU", "VIUTV").exclude_containing(&["6", "SIX"]);
    let items = publish(&cat, &[profile], &CurateOptions::default());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].url, "http://c");
}

#[test]
fn profiles_concatenate_in_order_and_relabel() {
    let cat = catalog(vec![
        entry("Jade HD", "http://j", (2024, 6, 1)),
        entry("ViuTV", "http://v", (2024, 6, 1)),
    ]);
    let profiles = [
        ChannelProfile::new("viu", "VIUTV").logo("https://logo/viutv.png"),
        ChannelProfile::new("Pearl", "Pearl"),
        ChannelProfile::new("jade", "翡翠台"),
    ];
    let opts = CurateOptions {
        group_title: "精选频道".into(),
        ..CurateOptions::default()
    };
    let items = publish(&cat, &profiles, &opts);

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].display_name, "VIUTV");
    assert_eq!(items[0].logo_url.as_deref(), Some("https://logo/viutv.png"));
    assert_eq!(items[1].display_name, "翡翠台");
    assert_eq!(items[1].logo_url, None);
    assert!(items.iter().all(|i| i.group_title == "精选频道"));
}

#[test]
fn order_field_beats_list_position() {
    let cat = catalog(vec![
        entry("Jade", "http://j", (2024, 6, 1)),
        entry("ViuTV", "http://v", (2024, 6, 1)),
        entry("Pearl", "http://p", (2024, 6, 1)),
    ]);
    let profiles = [
        ChannelProfile::new("viu", "VIUTV").order(2),
        ChannelProfile::new("pearl", "PEARL").order(1),
        ChannelProfile::new("jade", "JADE").order(1),
    ];
    let items = publish(&cat, &profiles, &CurateOptions::default());

    let names: Vec<_> = items.iter().map(|i| i.display_name.as_str()).collect();
    // equal order keeps list position
    assert_eq!(names, ["PEARL", "JADE", "VIUTV"]);
}

#[test]
fn custom_predicate_is_honoured() {
    let cat = catalog(vec![
        entry("Sports 1", "rtmp://x/1", (2024, 6, 1)),
        entry("Sports 2", "http://x/2", (2024, 6, 1)),
    ]);
    let profile =
        ChannelProfile::new("sports", "Sports").exclude_if(|e| e.url.starts_with("rtmp://"));
    let items = publish(&cat, &[profile], &CurateOptions::default());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].url, "http://x/2");
}
