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

//! Screen state machine.
//!
//! Exactly one screen is active at a time. Intents are routed to it and it
//! answers with the events its reaction produced: a [`AppEvent::ScreenChanged`]
//! for every transition, always ahead of any [`AppEvent::ItemSelected`]
//! caused by the same input.
//!
//! # Screens
//!
//! * **Idle**: attract loop cycling through the catalog. Any touch wakes the
//!   kiosk to the grid.
//! * **Grid**: paged 2x2 grid of items with a search icon and footer paging
//!   buttons. Swipes page with wraparound.
//! * **Confirm**: asks whether an item that can be contaminated is clean or
//!   dirty.
//! * **Result**: shows where the item goes. Any tap returns to the grid page
//!   it came from.
//! * **Search**: on-screen keyboard with a prefix-filtered result list.

pub mod layout;
pub mod render;

use log::{debug, info};

use crate::{
    events::AppEvent,
    idle::IdleTransition,
    input::Intent,
    model::{Category, ItemId, catalog::CatalogStore, search::SearchQuery},
    theme::Theme,
    util::format::{page_indicator, split_label, truncate_label},
};

use layout::{ConfirmHit, GridHit, ITEMS_PER_PAGE, Key, RESULT_ROWS, SearchHit};
use render::{GridCell, ScreenDescriptor};

const GRID_LABEL_LEN: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Idle,
    Grid,
    Confirm,
    Result,
    Search,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    Idle {
        attract_index: usize,
        next_change_at: u64,
    },
    GridBrowse {
        offset: usize,
    },
    ConfirmCleanliness {
        item_id: ItemId,
    },
    Result {
        item_id: ItemId,
        is_dirty: bool,
    },
    Search {
        query: SearchQuery,
        results: Vec<ItemId>,
        scroll: usize,
    },
}

impl ScreenState {
    pub fn kind(&self) -> ScreenKind {
        match self {
            ScreenState::Idle { .. } => ScreenKind::Idle,
            ScreenState::GridBrowse { .. } => ScreenKind::Grid,
            ScreenState::ConfirmCleanliness { .. } => ScreenKind::Confirm,
            ScreenState::Result { .. } => ScreenKind::Result,
            ScreenState::Search { .. } => ScreenKind::Search,
        }
    }
}

pub struct ScreenStateMachine {
    state: ScreenState,
    /// Grid page to return to from the confirm, result and search screens.
    grid_offset: usize,
    attract_interval_ms: u64,
    theme: Theme,
    needs_redraw: bool,
}

impl ScreenStateMachine {
    pub fn new(attract_interval_ms: u64) -> Self {
        Self {
            state: ScreenState::Idle {
                attract_index: 0,
                next_change_at: attract_interval_ms,
            },
            grid_offset: 0,
            attract_interval_ms,
            theme: Theme::default(),
            needs_redraw: true,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn kind(&self) -> ScreenKind {
        self.state.kind()
    }

    /// Enters the attract loop at boot.
    pub fn start(&mut self, now: u64, store: &CatalogStore) -> Vec<AppEvent> {
        self.go_idle(now, store)
    }

    /// Reacts to an event, returning the events it causes.
    ///
    /// Events the active screen has no use for are ignored.
    pub fn handle(&mut self, event: &AppEvent, store: &CatalogStore) -> Vec<AppEvent> {
        match event {
            AppEvent::Intent { intent, .. } => self.handle_intent(*intent, store),
            AppEvent::Idle {
                transition: IdleTransition::Entered,
                at,
            } => self.go_idle(*at, store),
            _ => vec![],
        }
    }

    /// Advances the attract loop.
    pub fn update(&mut self, now: u64, store: &CatalogStore) -> Vec<AppEvent> {
        let ScreenState::Idle {
            attract_index,
            next_change_at,
        } = &mut self.state
        else {
            return vec![];
        };
        if store.is_empty() || now < *next_change_at {
            return vec![];
        }

        *attract_index = (*attract_index + 1) % store.len();
        *next_change_at = now + self.attract_interval_ms;
        self.needs_redraw = true;

        store
            .all()
            .get(*attract_index)
            .map(|item| AppEvent::AttractItem(item.id))
            .into_iter()
            .collect()
    }

    /// Brings the active screen back in line with a newly loaded catalog.
    pub fn on_catalog_replaced(&mut self, store: &CatalogStore) {
        if self.grid_offset >= store.len() {
            self.grid_offset = 0;
        }

        match &mut self.state {
            ScreenState::Idle { attract_index, .. } => {
                if *attract_index >= store.len() {
                    *attract_index = 0;
                }
            }
            ScreenState::GridBrowse { offset } => {
                if *offset >= store.len() {
                    *offset = 0;
                }
            }
            ScreenState::ConfirmCleanliness { item_id } | ScreenState::Result { item_id, .. } => {
                if store.get(*item_id).is_none() {
                    self.state = ScreenState::GridBrowse {
                        offset: self.grid_offset,
                    };
                }
            }
            ScreenState::Search {
                query,
                results,
                scroll,
            } => {
                *results = query.matches(store);
                *scroll = 0;
            }
        }
        self.needs_redraw = true;
    }

    /// Returns whether the screen changed since the last call, clearing the
    /// flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    fn handle_intent(&mut self, intent: Intent, store: &CatalogStore) -> Vec<AppEvent> {
        match &self.state {
            ScreenState::Idle { .. } => {
                info!("Waking up");
                self.grid_offset = 0;
                vec![self.transition(ScreenState::GridBrowse { offset: 0 })]
            }
            ScreenState::GridBrowse { offset } => {
                let offset = *offset;
                match intent {
                    Intent::SwipeLeft => self.page_forward(offset, store),
                    Intent::SwipeRight => self.page_back(offset, store),
                    Intent::Tap { x, y } => self.grid_tap(offset, x, y, store),
                }
            }
            ScreenState::ConfirmCleanliness { item_id } => match intent {
                Intent::Tap { y, .. } => {
                    let item_id = *item_id;
                    match layout::confirm_hit(y) {
                        ConfirmHit::Clean => self.select(item_id, false, store),
                        ConfirmHit::Dirty => self.select(item_id, true, store),
                        ConfirmHit::Nothing => vec![],
                    }
                }
                _ => vec![],
            },
            ScreenState::Result { .. } => match intent {
                Intent::Tap { .. } => vec![self.transition(ScreenState::GridBrowse {
                    offset: self.grid_offset,
                })],
                _ => vec![],
            },
            ScreenState::Search { .. } => self.search_intent(intent, store),
        }
    }

    fn page_forward(&mut self, offset: usize, store: &CatalogStore) -> Vec<AppEvent> {
        let next = if offset + ITEMS_PER_PAGE < store.len() {
            offset + ITEMS_PER_PAGE
        } else {
            0
        };
        self.set_grid_offset(next);
        vec![]
    }

    fn page_back(&mut self, offset: usize, store: &CatalogStore) -> Vec<AppEvent> {
        let previous = if offset >= ITEMS_PER_PAGE {
            offset - ITEMS_PER_PAGE
        } else {
            store.len().saturating_sub(1) / ITEMS_PER_PAGE * ITEMS_PER_PAGE
        };
        self.set_grid_offset(previous);
        vec![]
    }

    fn set_grid_offset(&mut self, offset: usize) {
        debug!("Grid offset {}", offset);
        self.grid_offset = offset;
        self.state = ScreenState::GridBrowse { offset };
        self.needs_redraw = true;
    }

    fn grid_tap(&mut self, offset: usize, x: i32, y: i32, store: &CatalogStore) -> Vec<AppEvent> {
        match layout::grid_hit(x, y) {
            GridHit::Search => vec![self.transition(ScreenState::Search {
                query: SearchQuery::new(),
                results: vec![],
                scroll: 0,
            })],
            GridHit::PreviousPage => self.page_back(offset, store),
            GridHit::NextPage => self.page_forward(offset, store),
            GridHit::Cell(cell) => {
                let Some(item) = store.page(offset, ITEMS_PER_PAGE).get(cell) else {
                    return vec![];
                };
                debug!("Picked {}", item.name);
                if item.can_be_dirty {
                    vec![self.transition(ScreenState::ConfirmCleanliness { item_id: item.id })]
                } else {
                    let item_id = item.id;
                    self.select(item_id, false, store)
                }
            }
            GridHit::Nothing => vec![],
        }
    }

    /// Moves to the result screen for a confirmed selection.
    fn select(&mut self, item_id: ItemId, is_dirty: bool, store: &CatalogStore) -> Vec<AppEvent> {
        let Some(item) = store.get(item_id) else {
            return vec![];
        };
        let selected = AppEvent::ItemSelected {
            item_id,
            is_dirty,
            display_category: item.disposal_category(is_dirty),
        };
        vec![
            self.transition(ScreenState::Result { item_id, is_dirty }),
            selected,
        ]
    }

    fn search_intent(&mut self, intent: Intent, store: &CatalogStore) -> Vec<AppEvent> {
        let ScreenState::Search {
            query,
            results,
            scroll,
        } = &mut self.state
        else {
            return vec![];
        };

        match intent {
            Intent::SwipeLeft => {
                if *scroll + RESULT_ROWS < results.len() {
                    *scroll += 1;
                    self.needs_redraw = true;
                }
                vec![]
            }
            Intent::SwipeRight => {
                if *scroll > 0 {
                    *scroll -= 1;
                    self.needs_redraw = true;
                }
                vec![]
            }
            Intent::Tap { x, y } => match layout::search_hit(x, y, !results.is_empty()) {
                SearchHit::Exit => vec![self.leave_search()],
                SearchHit::Result(row) => {
                    let Some(item) = results.get(*scroll + row).and_then(|id| store.get(*id))
                    else {
                        return vec![];
                    };
                    let selected = AppEvent::ItemSelected {
                        item_id: item.id,
                        is_dirty: false,
                        display_category: item.category,
                    };
                    vec![self.leave_search(), selected]
                }
                SearchHit::Key(Key::Clear) if query.is_empty() => vec![self.leave_search()],
                SearchHit::Key(key) => {
                    match key {
                        Key::Char(c) => {
                            query.push(c);
                        }
                        Key::Backspace => {
                            query.backspace();
                        }
                        Key::Clear => query.clear(),
                    }
                    *results = query.matches(store);
                    *scroll = 0;
                    self.needs_redraw = true;
                    vec![]
                }
                SearchHit::Nothing => vec![],
            },
        }
    }

    fn leave_search(&mut self) -> AppEvent {
        self.transition(ScreenState::GridBrowse {
            offset: self.grid_offset,
        })
    }

    fn go_idle(&mut self, now: u64, store: &CatalogStore) -> Vec<AppEvent> {
        let mut events = vec![];
        if self.kind() != ScreenKind::Idle {
            events.push(self.transition(ScreenState::Idle {
                attract_index: 0,
                next_change_at: now + self.attract_interval_ms,
            }));
        } else {
            self.state = ScreenState::Idle {
                attract_index: 0,
                next_change_at: now + self.attract_interval_ms,
            };
            self.needs_redraw = true;
        }

        if let Some(item) = store.all().first() {
            events.push(AppEvent::AttractItem(item.id));
        }
        events
    }

    fn transition(&mut self, next: ScreenState) -> AppEvent {
        let from = self.kind();
        let to = next.kind();
        info!("Screen {:?} -> {:?}", from, to);

        self.state = next;
        self.needs_redraw = true;
        AppEvent::ScreenChanged { from, to }
    }

    /// Describes the active screen for the renderer.
    pub fn descriptor(&self, store: &CatalogStore) -> ScreenDescriptor {
        if store.is_empty() {
            return ScreenDescriptor::Unavailable {
                message: "Catalog unavailable".into(),
            };
        }

        match &self.state {
            ScreenState::Idle { attract_index, .. } => {
                let item = store.all().get(*attract_index);
                ScreenDescriptor::Idle {
                    item_id: item.map(|i| i.id),
                    lines: item.map(|i| split_label(&i.name)).unwrap_or_default(),
                    colour: item.map_or(self.theme.accent_colour, |i| i.color),
                }
            }
            ScreenState::GridBrowse { offset } => ScreenDescriptor::Grid {
                cells: store
                    .page(*offset, ITEMS_PER_PAGE)
                    .iter()
                    .map(|item| GridCell {
                        item_id: item.id,
                        label: truncate_label(&item.name, GRID_LABEL_LEN),
                        colour: item.color,
                    })
                    .collect(),
                page: page_indicator(*offset, store.len(), ITEMS_PER_PAGE),
                stale: store.snapshot().stale,
            },
            ScreenState::ConfirmCleanliness { item_id } => ScreenDescriptor::Confirm {
                item_id: *item_id,
                name: store.get(*item_id).map(|i| i.name.clone()).unwrap_or_default(),
            },
            ScreenState::Result { item_id, is_dirty } => {
                let item = store.get(*item_id);
                let category =
                    item.map_or(Category::Waste, |i| i.disposal_category(*is_dirty));
                ScreenDescriptor::Result {
                    item_id: *item_id,
                    name: item.map(|i| i.name.clone()).unwrap_or_default(),
                    category,
                    is_dirty: *is_dirty,
                    colour: self.theme.category_colour(category),
                }
            }
            ScreenState::Search {
                query,
                results,
                scroll,
            } => ScreenDescriptor::Search {
                query: query.as_str().to_owned(),
                results: results
                    .iter()
                    .skip(*scroll)
                    .take(RESULT_ROWS)
                    .filter_map(|id| store.get(*id))
                    .map(|item| item.name.clone())
                    .collect(),
                total: results.len(),
            },
        }
    }
}
