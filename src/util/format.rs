// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

/// Formats the page indicator shown in the grid footer, e.g. `2/5`.
///
/// An empty catalog still shows a single page.
///
/// # Arguments
///
/// * `offset` - Index of the first item on the current page.
/// * `total` - Number of items in the catalog.
/// * `per_page` - Items on one page.
///
/// # Examples
///
/// ```
/// use sortkiosk::util::format::page_indicator;
/// assert_eq!(page_indicator(4, 6, 4), "2/2");
/// assert_eq!(page_indicator(0, 0, 4), "1/1");
/// ```
pub fn page_indicator(offset: usize, total: usize, per_page: usize) -> String {
    let per_page = per_page.max(1);
    let pages = total.div_ceil(per_page).max(1);
    let page = (offset / per_page + 1).min(pages);
    format!("{}/{}", page, pages)
}

/// Splits an item name into the lines drawn inside the attract circle.
///
/// Names of up to 14 characters stay on one line. Longer names break at the
/// space, comma or parenthesis nearest to the middle, searching backwards
/// first.
pub fn split_label(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= 14 {
        return vec![name.to_owned()];
    }

    let is_break = |c: char| c == ' ' || c == ',' || c == '(';
    let middle = chars.len() / 2;
    let split = (0..=middle)
        .rev()
        .find(|i| is_break(chars[*i]))
        .or_else(|| (middle..chars.len()).find(|i| is_break(chars[*i])));

    match split {
        Some(i) if i > 0 => {
            let first: String = chars[..i].iter().collect();
            let second: String = chars[i + 1..].iter().collect();
            vec![first.trim().to_owned(), second.trim().to_owned()]
        }
        _ => vec![name.to_owned()],
    }
}

/// Shortens a label to `max` characters, ending it with `..` when cut.
pub fn truncate_label(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_owned();
    }
    let kept: String = name.chars().take(max.saturating_sub(2)).collect();
    format!("{}..", kept)
}
