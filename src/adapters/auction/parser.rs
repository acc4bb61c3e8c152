//! Scrapes bid state out of the auction host's HTML.
//!
//! The markup is undocumented, so each field is looked up through a list of
//! selectors and then a text pattern. A miss is never an error: the field
//! becomes zero.

use crate::domain::auction::AuctionSnapshot;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Selector plus the attribute holding the value; `None` means the element text.
type Lookup = (&'static str, Option<&'static str>);

const CURRENT_BID_SELECTORS: &[Lookup] = &[
    ("[data-current-bid]", Some("data-current-bid")),
    ("#current-bid", None),
    (".current-bid", None),
    (".bid-amount", None),
];
const BID_COUNT_SELECTORS: &[Lookup] =
    &[("[data-bid-count]", Some("data-bid-count")), ("#bid-count", None), (".bid-count", None)];
const BID_ERROR_SELECTORS: &[&str] = &["#bid-error", ".bid-error"];

static CURRENT_BID_TEXT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)current\s+bid[^0-9$]*\$?\s*([0-9][0-9,]*(?:\.[0-9]+)?)").ok());
static BID_COUNT_TEXT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)([0-9][0-9,]*)\s+bids?\b").ok());
static NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?").ok());

#[must_use]
pub fn parse_snapshot(auction_id: &str, html: &str) -> AuctionSnapshot {
    let document = Html::parse_document(html);
    let text = document.root_element().text().collect::<Vec<_>>().join(" ");

    let current_bid = select_value(&document, CURRENT_BID_SELECTORS, parse_number)
        .or_else(|| capture(&CURRENT_BID_TEXT, &text).and_then(|raw| parse_number(&raw)))
        .unwrap_or(0.0);

    let bid_count = select_value(&document, BID_COUNT_SELECTORS, parse_count)
        .or_else(|| capture(&BID_COUNT_TEXT, &text).and_then(|raw| parse_count(&raw)))
        .unwrap_or(0);

    AuctionSnapshot { auction_id: auction_id.to_string(), current_bid, bid_count }
}

/// Text of the bid error element, if the page rendered a non-empty one.
#[must_use]
pub fn parse_bid_error(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    BID_ERROR_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .map(|element| collapse_whitespace(&element.text().collect::<String>()))
                .find(|message| !message.is_empty())
        })
}

/// First value among the matched elements that `parse` accepts; unparseable
/// matches fall through to the next element and selector.
fn select_value<T>(document: &Html, lookups: &[Lookup], parse: fn(&str) -> Option<T>) -> Option<T> {
    lookups.iter().find_map(|(css, attribute)| {
        let selector = Selector::parse(css).ok()?;
        document
            .select(&selector)
            .filter_map(|element| element_value(element, *attribute))
            .find_map(|raw| parse(&raw))
    })
}

fn element_value(element: ElementRef<'_>, attribute: Option<&str>) -> Option<String> {
    let raw = match attribute {
        Some(name) => element.value().attr(name).map(str::to_string),
        None => Some(element.text().collect::<String>()),
    }?;
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn capture(pattern: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    pattern.as_ref()?.captures(text)?.get(1).map(|m| m.as_str().to_string())
}

fn first_number(raw: &str) -> Option<String> {
    NUMBER.as_ref()?.find(raw).map(|m| m.as_str().replace(',', ""))
}

fn parse_number(raw: &str) -> Option<f64> {
    first_number(raw)?.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_count(raw: &str) -> Option<u32> {
    first_number(raw)?.split('.').next()?.parse().ok()
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
