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

//! Built-in catalog used when neither the service nor a local file can
//! provide one.

use crate::model::{Category, Item};

pub fn builtin_items() -> Vec<Item> {
    vec![
        Item::new(1, "Plastic bottle", Category::Plastic).with_description("Empty and rinsed"),
        Item::new(2, "Paper", Category::Paper)
            .with_can_be_dirty(false)
            .with_description("Undamaged paper"),
        Item::new(3, "Apple", Category::Green)
            .with_can_be_dirty(false)
            .with_description("Organic waste"),
        Item::new(4, "Can", Category::Waste)
            .with_can_be_dirty(false)
            .with_description("Aluminium can"),
    ]
}
