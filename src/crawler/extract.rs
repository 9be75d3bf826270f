//! Field extractors for listing pages
//!
//! Each extractor reads one parsed document and returns the values for one
//! group of output columns, in column order. Missing elements never fail:
//! single-valued extractors return one empty string and iterating ones
//! return nothing.
//!
//! Element text is the concatenation of all descendant text nodes, exactly
//! as it appears in the page (no trimming).

use crate::url::{absolutize_href, ListingUrl};
use scraper::{ElementRef, Html, Selector};

/// Title attribute marking the site-address anchor in the intro block
pub const ADDRESS_TITLE: &str = "基地地址";

/// Detail-page section heading for transport access
pub const TRANSIT_SECTION: &str = "交通出行";

/// Detail-page section heading for surrounding amenities
pub const AMENITIES_SECTION: &str = "周邊機能";

/// Parses one of this module's constant selectors
fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Concatenated text of an element and its descendants
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Direct element children of `parent` that match `selector`
fn children_matching<'a>(
    parent: ElementRef<'a>,
    selector: &'a Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| selector.matches(child))
}

/// Formats a spreadsheet formula that renders as a clickable link
///
/// Double quotes inside either argument are doubled, as the formula syntax
/// requires.
pub fn hyperlink_formula(url: &str, label: &str) -> String {
    format!(
        "=HYPERLINK(\"{}\", \"{}\")",
        url.replace('"', "\"\""),
        label.replace('"', "\"\"")
    )
}

/// Community-plan rows at these zero-based positions carry nothing useful
pub fn is_skipped_plan_row(index: usize) -> bool {
    (4..=7).contains(&index) || index >= 12
}

/// Listing name: text of the first `.build-name`
pub fn name(doc: &Html) -> Vec<String> {
    let value = selector(".build-name")
        .and_then(|sel| doc.select(&sel).next().map(text_of))
        .unwrap_or_default();
    vec![value]
}

/// Listing link: the query-stripped URL itself
pub fn listing_url(url: &ListingUrl) -> Vec<String> {
    vec![url.as_str().to_string()]
}

/// Price per unit area: the first `.price` child of any `.build-price`
pub fn price_per_area(doc: &Html) -> Vec<String> {
    let value = match (selector(".build-price"), selector(".price")) {
        (Some(container), Some(price)) => doc
            .select(&container)
            .flat_map(|el| children_matching(el, &price))
            .next()
            .map(text_of)
            .unwrap_or_default(),
        _ => String::new(),
    };
    vec![value]
}

/// Intro information block
///
/// For each `.info-item` child of the first `.intro-info`:
/// - if its first `a[title]` child is titled [`ADDRESS_TITLE`], a
///   `=HYPERLINK(...)` formula for that anchor;
/// - the text of every `.value` child of its `p` children.
pub fn other_info(doc: &Html) -> Vec<String> {
    let mut values = Vec::new();

    let (Some(intro), Some(item), Some(anchor), Some(para), Some(value)) = (
        selector(".intro-info"),
        selector(".info-item"),
        selector("a[title]"),
        selector("p"),
        selector(".value"),
    ) else {
        return values;
    };

    let Some(block) = doc.select(&intro).next() else {
        return values;
    };

    for info in children_matching(block, &item) {
        if let Some(link) = children_matching(info, &anchor).next() {
            if link.value().attr("title") == Some(ADDRESS_TITLE) {
                let href = absolutize_href(link.value().attr("href").unwrap_or_default());
                values.push(hyperlink_formula(&href, &text_of(link)));
            }
        }

        for p in children_matching(info, &para) {
            values.extend(children_matching(p, &value).map(text_of));
        }
    }

    values
}

/// Community plan rows
///
/// Walks every `.list-item` inside `.community-plan-container` in document
/// order, skipping the positions rejected by [`is_skipped_plan_row`]. Each
/// kept row contributes its `p` children's text, then its `div` children's.
pub fn community_plan(doc: &Html) -> Vec<String> {
    let mut values = Vec::new();

    let (Some(rows), Some(para), Some(div)) = (
        selector(".community-plan-container .list-item"),
        selector("p"),
        selector("div"),
    ) else {
        return values;
    };

    for (index, row) in doc.select(&rows).enumerate() {
        if is_skipped_plan_row(index) {
            continue;
        }

        values.extend(children_matching(row, &para).map(text_of));
        values.extend(children_matching(row, &div).map(text_of));
    }

    values
}

/// Transit and amenity lists from the detail page
///
/// Only sections whose `h3` heading is [`TRANSIT_SECTION`] or
/// [`AMENITIES_SECTION`] contribute; each `li` inside them yields the joined
/// text of its `p` children.
pub fn sub_detail(doc: &Html) -> Vec<String> {
    let mut values = Vec::new();

    let (Some(sections), Some(heading), Some(item), Some(para)) = (
        selector(".sub-detail-item.anchor-nav-item"),
        selector("h3"),
        selector("li"),
        selector("p"),
    ) else {
        return values;
    };

    for section in doc.select(&sections) {
        let title = children_matching(section, &heading)
            .next()
            .map(text_of)
            .unwrap_or_default();

        if title != TRANSIT_SECTION && title != AMENITIES_SECTION {
            continue;
        }

        for li in section.select(&item) {
            values.push(children_matching(li, &para).map(text_of).collect());
        }
    }

    values
}

/// Every field group read from the main listing page, in column order
pub fn main_page_fields(doc: &Html, url: &ListingUrl) -> Vec<String> {
    let mut values = name(doc);
    values.extend(listing_url(url));
    values.extend(price_per_area(doc));
    values.extend(other_info(doc));
    values.extend(community_plan(doc));
    values
}
