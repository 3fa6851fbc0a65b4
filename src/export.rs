// src/export.rs
//! Playlist renderers. Both are pure functions of the item slice.

use std::fmt::Write as _;

use crate::curate::PublishItem;

/// Extended M3U. The header carries the program guide url when one is set.
pub fn render_m3u(items: &[PublishItem], epg_url: Option<&str>) -> String {
    let mut out = String::new();
    match epg_url.filter(|u| !u.is_empty()) {
        Some(epg) => {
            let _ = writeln!(out, "#EXTM3U x-tvg-url=\"{epg}\"");
        }
        None => out.push_str("#EXTM3U\n"),
    }

    for it in items {
        let _ = write!(out, "#EXTINF:-1 tvg-name=\"{}\"", it.display_name);
        if let Some(logo) = it.logo_url.as_deref().filter(|l| !l.is_empty()) {
            let _ = write!(out, " tvg-logo=\"{logo}\"");
        }
        let _ = writeln!(out, " group-title=\"{}\",{}", it.group_title, it.display_name);
        let _ = writeln!(out, "{}", it.url);
    }
    out
}

/// `name,url` per line, no header.
pub fn render_txt(items: &[PublishItem]) -> String {
    let mut out = String::new();
    for it in items {
        let _ = writeln!(out, "{},{}", it.display_name, it.url);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, logo: Option<&str>, url: &str) -> PublishItem {
        PublishItem {
            display_name: name.into(),
            logo_url: logo.map(str::to_string),
            group_title: "精选频道".into(),
            url: url.into(),
        }
    }

    #[test]
    fn m3u_with_guide_and_logo() {
        let items = [
            item("VIUTV", Some("https://logo/viutv.png"), "http://a/1.m3u8"),
            item("翡翠台", None, "http://b/2.m3u8"),
        ];
        let out = render_m3u(&items, Some("https://epg/e.xml"));
        assert_eq!(
            out,
            "#EXTM3U x-tvg-url=\"https://epg/e.xml\"\n\
             #EXTINF:-1 tvg-name=\"VIUTV\" tvg-logo=\"https://logo/viutv.png\" \
              group-title=\"精选频道\",VIUTV\n\
             http://a/1.m3u8\n\
             #EXTINF:-1 tvg-name=\"翡翠台\" group-title=\"精选频道\",翡翠台\n\
             http://b/2.m3u8\n"
        );
    }

    #[test]
    fn m3u_without_guide_has_bare_header() {
        assert_eq!(render_m3u(&[], None), "#EXTM3U\n");
        assert_eq!(render_m3u(&[], Some("")), "#EXTM3U\n");
    }

    #[test]
    fn txt_is_one_line_per_item() {
        let items = [item("A", None, "http://a"), item("B", Some("l"), "http://b")];
        assert_eq!(render_txt(&items), "A,http://a\nB,http://b\n");
        assert_eq!(render_txt(&[]), "");
    }
}
