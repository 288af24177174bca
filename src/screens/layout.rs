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

//! Screen geometry and hit-testing.
//!
//! All coordinates are portrait panel pixels, 240 wide and 320 tall.

use crate::input::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const HEADER_HEIGHT: i32 = 40;
pub const FOOTER_HEIGHT: i32 = 50;
pub const FOOTER_TOP: i32 = SCREEN_HEIGHT - FOOTER_HEIGHT;

pub const GRID_COLS: usize = 2;
pub const GRID_ROWS: usize = 2;
pub const ITEMS_PER_PAGE: usize = GRID_COLS * GRID_ROWS;

/// Top of the clean/dirty buttons in the confirmation popup.
pub const CONFIRM_TOP: i32 = 60;
/// Boundary between the clean and dirty buttons.
pub const CONFIRM_SPLIT: i32 = 190;

pub const SEARCH_HEADER_HEIGHT: i32 = 60;
pub const RESULTS_BOTTOM: i32 = 140;
pub const RESULT_ROW_HEIGHT: i32 = 40;
pub const RESULT_ROWS: usize = 2;

pub const KEYBOARD_COLS: usize = 6;
pub const KEYBOARD_ROWS: usize = 5;
pub const KEYBOARD: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ<X .";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridHit {
    Search,
    PreviousPage,
    NextPage,
    /// Position on the current page, row-major.
    Cell(usize),
    Nothing,
}

pub fn grid_hit(x: i32, y: i32) -> GridHit {
    if x > 200 && y < HEADER_HEIGHT {
        return GridHit::Search;
    }
    if y >= FOOTER_TOP {
        return if x < 80 {
            GridHit::PreviousPage
        } else if x > 160 {
            GridHit::NextPage
        } else {
            GridHit::Nothing
        };
    }
    if y < HEADER_HEIGHT {
        return GridHit::Nothing;
    }

    let cell_width = SCREEN_WIDTH / GRID_COLS as i32;
    let cell_height = (FOOTER_TOP - HEADER_HEIGHT) / GRID_ROWS as i32;
    let col = ((x / cell_width).max(0) as usize).min(GRID_COLS - 1);
    let row = (((y - HEADER_HEIGHT) / cell_height).max(0) as usize).min(GRID_ROWS - 1);

    GridHit::Cell(row * GRID_COLS + col)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmHit {
    Clean,
    Dirty,
    Nothing,
}

pub fn confirm_hit(y: i32) -> ConfirmHit {
    if y >= CONFIRM_SPLIT {
        ConfirmHit::Dirty
    } else if y >= CONFIRM_TOP {
        ConfirmHit::Clean
    } else {
        ConfirmHit::Nothing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    /// Clears the query, or leaves search when it is already empty.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchHit {
    Exit,
    /// Visible result row, counted from the top of the list.
    Result(usize),
    Key(Key),
    Nothing,
}

/// Hit-tests the search screen. The keyboard moves down to make room for the
/// result list when there are results.
pub fn search_hit(x: i32, y: i32, has_results: bool) -> SearchHit {
    if x > 190 && y < SEARCH_HEADER_HEIGHT {
        return SearchHit::Exit;
    }
    if has_results && (SEARCH_HEADER_HEIGHT..RESULTS_BOTTOM).contains(&y) {
        return SearchHit::Result(((y - SEARCH_HEADER_HEIGHT) / RESULT_ROW_HEIGHT) as usize);
    }

    let keyboard_top = if has_results {
        RESULTS_BOTTOM
    } else {
        SEARCH_HEADER_HEIGHT
    };
    if y < keyboard_top {
        return SearchHit::Nothing;
    }

    let key_width = SCREEN_WIDTH / KEYBOARD_COLS as i32;
    let key_height = (SCREEN_HEIGHT - keyboard_top) / KEYBOARD_ROWS as i32;
    let col = ((x / key_width).max(0) as usize).min(KEYBOARD_COLS - 1);
    let row = (((y - keyboard_top) / key_height) as usize).min(KEYBOARD_ROWS - 1);

    key_at(row * KEYBOARD_COLS + col).map_or(SearchHit::Nothing, SearchHit::Key)
}

fn key_at(index: usize) -> Option<Key> {
    match KEYBOARD.chars().nth(index)? {
        '<' => Some(Key::Backspace),
        'X' if index == 27 => Some(Key::Clear),
        c => Some(Key::Char(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_regions() {
        assert_eq!(grid_hit(220, 20), GridHit::Search);
        assert_eq!(grid_hit(100, 20), GridHit::Nothing);
        assert_eq!(grid_hit(30, 290), GridHit::PreviousPage);
        assert_eq!(grid_hit(200, 300), GridHit::NextPage);
        assert_eq!(grid_hit(120, 300), GridHit::Nothing);

        assert_eq!(grid_hit(30, 50), GridHit::Cell(0));
        assert_eq!(grid_hit(200, 100), GridHit::Cell(1));
        assert_eq!(grid_hit(30, 200), GridHit::Cell(2));
        assert_eq!(grid_hit(239, 269), GridHit::Cell(3));
    }

    #[test]
    fn confirm_regions() {
        assert_eq!(confirm_hit(30), ConfirmHit::Nothing);
        assert_eq!(confirm_hit(60), ConfirmHit::Clean);
        assert_eq!(confirm_hit(189), ConfirmHit::Clean);
        assert_eq!(confirm_hit(190), ConfirmHit::Dirty);
    }

    #[test]
    fn keyboard_without_results_starts_under_the_header() {
        assert_eq!(search_hit(210, 30, false), SearchHit::Exit);
        assert_eq!(search_hit(210, 30, true), SearchHit::Exit);
        assert_eq!(search_hit(10, 30, false), SearchHit::Nothing);
        // 52 px rows from y=60
        assert_eq!(search_hit(10, 70, false), SearchHit::Key(Key::Char('A')));
        assert_eq!(search_hit(230, 70, false), SearchHit::Key(Key::Char('F')));
        assert_eq!(search_hit(90, 120, false), SearchHit::Key(Key::Char('I')));
        assert_eq!(search_hit(90, 310, false), SearchHit::Key(Key::Backspace));
        assert_eq!(search_hit(130, 310, false), SearchHit::Key(Key::Clear));
        assert_eq!(search_hit(170, 310, false), SearchHit::Key(Key::Char(' ')));
        assert_eq!(search_hit(230, 310, false), SearchHit::Key(Key::Char('.')));
    }

    #[test]
    fn results_push_the_keyboard_down() {
        assert_eq!(search_hit(50, 70, true), SearchHit::Result(0));
        assert_eq!(search_hit(50, 139, true), SearchHit::Result(1));
        // 36 px rows from y=140
        assert_eq!(search_hit(10, 150, true), SearchHit::Key(Key::Char('A')));
        assert_eq!(search_hit(10, 180, true), SearchHit::Key(Key::Char('G')));
    }
}
