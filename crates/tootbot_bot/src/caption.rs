//! Caption assembly.
//!
//! A caption is `title hashtags shortlink` plus an optional promo suffix,
//! truncated at the title so the whole text fits the destination budget.
//! Lengths are counted in characters.

/// Marker appended to a shortened title.
pub const ELLIPSIS: &str = "...";

/// Separator placed between the link and the promo message.
pub const PROMO_SEPARATOR: &str = " \n \n";

/// Render tags as `#tag` words joined by single spaces.
///
/// Per-source tags come first, then the global ones.
pub fn hashtag_string(source_tags: &[String], global_tags: &[String]) -> String {
    source_tags
        .iter()
        .chain(global_tags)
        .map(|tag| tag.trim().trim_start_matches('#'))
        .filter(|tag| !tag.is_empty())
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compose a caption no longer than `budget` characters.
///
/// The title is kept whole when `title + " " + hashtags + " " + shortlink +
/// promo` fits; otherwise it is cut and suffixed with [`ELLIPSIS`].
///
/// ```
/// use tootbot_bot::compose_caption;
///
/// let caption = compose_caption("Cool cat", "#cats", "https://redd.it/abc123", None, 500);
/// assert_eq!(caption, "Cool cat #cats https://redd.it/abc123");
///
/// let short = compose_caption("A rather long title", "", "https://redd.it/x", None, 30);
/// assert_eq!(short, "A rather... https://redd.it/x");
/// # assert!(short.chars().count() <= 30);
/// ```
pub fn compose_caption(
    title: &str,
    hashtags: &str,
    shortlink: &str,
    promo: Option<&str>,
    budget: usize,
) -> String {
    let mut tail = String::new();
    if !hashtags.is_empty() {
        tail.push(' ');
        tail.push_str(hashtags);
    }
    tail.push(' ');
    tail.push_str(shortlink);
    if let Some(message) = promo.filter(|m| !m.is_empty()) {
        tail.push_str(PROMO_SEPARATOR);
        tail.push_str(message);
    }

    let title = title.trim();
    let title_len = title.chars().count();
    let tail_len = tail.chars().count();

    let caption = if title_len + tail_len <= budget {
        format!("{}{}", title, tail)
    } else {
        let room = budget.saturating_sub(tail_len + ELLIPSIS.len());
        let cut: String = title.chars().take(room).collect();
        format!("{}{}{}", cut.trim_end(), ELLIPSIS, tail)
    };

    // The tail alone can exceed a tiny budget.
    if caption.chars().count() > budget {
        caption.chars().take(budget).collect()
    } else {
        caption
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hashtag_string_order() {
        assert_eq!(
            hashtag_string(&tags(&["photo", " pics "]), &tags(&["bot"])),
            "#photo #pics #bot"
        );
        assert_eq!(hashtag_string(&[], &[]), "");
        assert_eq!(hashtag_string(&tags(&["#already", ""]), &[]), "#already");
    }

    #[test]
    fn test_full_title_when_it_fits() {
        let caption = compose_caption("Cool cat", "", "https://redd.it/abc123", None, 500);
        assert_eq!(caption, "Cool cat https://redd.it/abc123");
    }

    #[test]
    fn test_truncation_boundary() {
        let link = "https://redd.it/x";
        // title + " " + link is exactly 30 characters
        let title = "a".repeat(30 - 1 - link.len());
        let fits = compose_caption(&title, "", link, None, 30);
        assert_eq!(fits.chars().count(), 30);
        assert!(!fits.contains(ELLIPSIS));

        let longer = format!("{}b", title);
        let cut = compose_caption(&longer, "", link, None, 30);
        assert!(cut.contains(ELLIPSIS));
        assert!(cut.chars().count() <= 30);
        assert!(cut.ends_with(link));
    }

    #[test]
    fn test_promo_suffix() {
        let caption = compose_caption("Title", "#a", "https://redd.it/x", Some("Follow us"), 500);
        assert_eq!(caption, "Title #a https://redd.it/x \n \nFollow us");
    }

    #[test]
    fn test_never_exceeds_budget() {
        let long = "x".repeat(600);
        let titles = ["", "short", "ünïcödé títle with àccents", long.as_str()];
        let hashtags = ["", "#one", "#one #two #three #four"];
        let promos = [None, Some("Check out our other bots!")];
        for budget in [1, 10, 40, 80, 500] {
            for title in titles {
                for tags in hashtags {
                    for promo in promos {
                        let caption = compose_caption(title, tags, "https://redd.it/abc123", promo, budget);
                        assert!(
                            caption.chars().count() <= budget,
                            "{:?} exceeds {}",
                            caption,
                            budget
                        );
                    }
                }
            }
        }
    }
}
