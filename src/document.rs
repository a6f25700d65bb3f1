//! Wiki article rendering.
//!
//! Takes everything a build gathered and writes the article text: infobox,
//! track list, lineup, reviews, references and external links.

use chrono::{Datelike, NaiveDate};

use crate::citation::CitationFragment;
use crate::extract::MONTHS_GENITIVE;
use crate::models::{Member, Neighbor, ReleaseInfo, Track};

/// External links offered at the end of the article.
#[derive(Debug, Clone, Default)]
pub struct ExternalLinks {
    pub discogs: Option<String>,
    pub metal_archives: Option<String>,
    pub bandcamp: Option<String>,
}

/// Everything one article is rendered from.
#[derive(Debug, Clone)]
pub struct AlbumDocument {
    pub release: ReleaseInfo,
    pub tracks: Vec<Track>,
    pub members: Vec<Member>,
    pub reviews: Vec<CitationFragment>,
    pub previous: Option<Neighbor>,
    pub next: Option<Neighbor>,
    pub links: ExternalLinks,
}

impl AlbumDocument {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_infobox(&mut out);
        self.render_tracklist(&mut out);
        self.render_lineup(&mut out);
        self.render_reviews(&mut out);
        out.push_str("\n== Lähteet ==\n{{viitteet}}\n");
        self.render_links(&mut out);
        out
    }

    /// File name for the article: `Artist-Title.txt`, spaces as underscores.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.txt",
            self.release.artist.replace(' ', "_"),
            self.release.title.replace(' ', "_")
        )
        .replace('/', "_")
    }

    fn render_infobox(&self, out: &mut String) {
        let release = &self.release;
        let (prev_title, prev_year) = neighbor_fields(self.previous.as_ref());
        let (next_title, next_year) = neighbor_fields(self.next.as_ref());

        let rows = [
            ("levy", release.title.clone()),
            ("artisti", wiki_link(&release.artist)),
            ("julkaistu", full_date(&release.release_date)),
            ("minuutit", release.minutes().to_string()),
            ("sekunnit", release.seconds_label()),
            ("tämä", release.title.clone()),
            ("vuosit", release.year().to_string()),
            ("edellinen", prev_title),
            ("vuosie", prev_year),
            ("seuraava", next_title),
            ("vuosis", next_year),
        ];

        out.push_str("{{Levytiedot\n");
        for (key, value) in rows {
            out.push_str(&format!(" | {:<17} = {}\n", key, value));
        }
        out.push_str("}}\n");
    }

    fn render_tracklist(&self, out: &mut String) {
        out.push_str("\n== Kappaleet ==\n{{Kappalelista\n");
        out.push_str(&format!(
            " | kokonaiskesto    = {}.{}\n",
            self.release.minutes(),
            self.release.seconds_label()
        ));
        for track in &self.tracks {
            let n = track.number;
            out.push_str(&format!(" | {:<16} = {}\n", format!("nimi{}", n), track.title));
            out.push_str(&format!(" | {:<16} = \n", format!("huom{}", n)));
            out.push_str(&format!(
                " | {:<16} = {}\n",
                format!("pituus{}", n),
                track.duration_label()
            ));
        }
        out.push_str("}}\n");
    }

    fn render_lineup(&self, out: &mut String) {
        out.push_str("\n== Kokoonpano ==\n");
        for member in &self.members {
            let instruments: Vec<String> =
                member.instruments.iter().map(|i| wiki_link(i)).collect();
            out.push_str(&format!(
                "* {} - {}\n",
                wiki_link(&member.name),
                instruments.join(", ")
            ));
        }
    }

    fn render_reviews(&self, out: &mut String) {
        out.push_str("\n== Arvostelut ==\n");
        for review in &self.reviews {
            out.push_str(&review.render());
            out.push('\n');
        }
    }

    fn render_links(&self, out: &mut String) {
        out.push_str("\n== Aiheesta muualla ==\n");
        if let Some(id) = self.links.discogs.as_deref().and_then(discogs_id) {
            out.push_str(&format!("* {{{{Discogs|master|{}}}}}\n", id));
        }
        if let Some(id) = self.links.metal_archives.as_deref().and_then(last_segment) {
            out.push_str(&format!("* {{{{Metal-archives|levy={}}}}}\n", id));
        }
        if let Some(url) = self.links.bandcamp.as_deref().filter(|u| !u.is_empty()) {
            out.push_str(&format!(
                "* [{} Albumi ''{}''] [[Bandcamp]] -sivustolla {{{{en}}}}\n",
                url, self.release.title
            ));
        }
    }
}

fn wiki_link(target: &str) -> String {
    format!("[[{}]]", target)
}

fn neighbor_fields(neighbor: Option<&Neighbor>) -> (String, String) {
    match neighbor {
        Some(n) => (wiki_link(&n.title), n.year.clone()),
        None => (String::new(), String::new()),
    }
}

/// `2023-03-14` → `14. maaliskuuta 2023`. Unparseable dates pass through.
pub fn full_date(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        Ok(date) => format!(
            "{}. {} {}",
            date.day(),
            MONTHS_GENITIVE[date.month0() as usize],
            date.year()
        ),
        Err(_) => iso.to_string(),
    }
}

fn last_segment(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
}

/// `https://www.discogs.com/master/26111269-Band-Album` → `26111269`.
fn discogs_id(url: &str) -> Option<&str> {
    last_segment(url)?
        .split('-')
        .next()
        .filter(|id| id.chars().all(|c| c.is_ascii_digit()) && !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> AlbumDocument {
        AlbumDocument {
            release: ReleaseInfo {
                title: "Everything Belongs to Death".to_string(),
                artist: "Parasitario".to_string(),
                artist_id: "1".to_string(),
                release_date: "2023-03-14".to_string(),
                duration_secs: 2405,
            },
            tracks: vec![Track {
                number: 1,
                title: "Intro".to_string(),
                duration_secs: 65,
            }],
            members: vec![Member {
                name: "Jaska Jokunen".to_string(),
                instruments: vec!["kitara".to_string(), "laulu".to_string()],
            }],
            reviews: vec![CitationFragment {
                rating_line: Some("* [[Kaaoszine]]: {{Arvostelutähdet|4|5}}".to_string()),
                reference: "<ref>{{Verkkoviite | Osoite = u }}</ref>".to_string(),
            }],
            previous: Some(Neighbor {
                title: "Debut".to_string(),
                year: "2020".to_string(),
            }),
            next: None,
            links: ExternalLinks {
                discogs: Some(
                    "https://www.discogs.com/release/26111269-Parasitario-Everything-Belongs-To-Death"
                        .to_string(),
                ),
                metal_archives: Some(
                    "https://www.metal-archives.com/albums/Watain/Sworn_to_the_Dark/144497"
                        .to_string(),
                ),
                bandcamp: None,
            },
        }
    }

    #[test]
    fn test_full_date() {
        assert_eq!(full_date("2023-03-14"), "14. maaliskuuta 2023");
        assert_eq!(full_date("2023"), "2023");
    }

    #[test]
    fn test_infobox_fields() {
        let text = document().render();
        assert!(text.contains(" | levy              = Everything Belongs to Death\n"));
        assert!(text.contains(" | artisti           = [[Parasitario]]\n"));
        assert!(text.contains(" | julkaistu         = 14. maaliskuuta 2023\n"));
        assert!(text.contains(" | minuutit          = 40\n"));
        assert!(text.contains(" | sekunnit          = 05\n"));
        assert!(text.contains(" | edellinen         = [[Debut]]\n"));
        assert!(text.contains(" | vuosie            = 2020\n"));
        assert!(text.contains(" | seuraava          = \n"));
    }

    #[test]
    fn test_sections() {
        let text = document().render();
        assert!(text.contains(" | kokonaiskesto    = 40.05\n"));
        assert!(text.contains(" | nimi1            = Intro\n"));
        assert!(text.contains(" | pituus1          = 1.05\n"));
        assert!(text.contains("* [[Jaska Jokunen]] - [[kitara]], [[laulu]]\n"));
        assert!(text.contains(
            "== Arvostelut ==\n* [[Kaaoszine]]: {{Arvostelutähdet|4|5}}<ref>"
        ));
        assert!(text.contains("== Lähteet ==\n{{viitteet}}\n"));
        assert!(text.contains("* {{Discogs|master|26111269}}\n"));
        assert!(text.contains("* {{Metal-archives|levy=144497}}\n"));
        assert!(!text.contains("Bandcamp"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            document().file_name(),
            "Parasitario-Everything_Belongs_to_Death.txt"
        );
    }
}
