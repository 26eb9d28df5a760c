use std::cell::{Cell, RefCell};

use reinstate_core::{ChildHandle, Surface};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use taffy::prelude::*;

use crate::geometry::{Rect, Size as RegionSize};

new_key_type! {
    pub struct ViewKey;
}

struct HostedView<C> {
    child: C,
    hidden: bool,
    fills: bool,
}

struct RegionState<C> {
    views: SlotMap<ViewKey, HostedView<C>>,
    /// Inserted views, back to front.
    z_order: SmallVec<[ViewKey; 4]>,
}

impl<C: ChildHandle> RegionState<C> {
    fn key_of(&self, child: &C) -> Option<ViewKey> {
        self.views
            .iter()
            .find(|(_, v)| v.child.is_same(child))
            .map(|(k, _)| k)
    }
}

/// A headless rectangular surface. Children are laid out with taffy; a
/// child constrained to fill always gets the region's full bounds.
pub struct Region<C: ChildHandle> {
    bounds: Cell<RegionSize>,
    state: RefCell<RegionState<C>>,
}

impl<C: ChildHandle> Region<C> {
    pub fn new(bounds: RegionSize) -> Self {
        Self {
            bounds: Cell::new(bounds),
            state: RefCell::new(RegionState {
                views: SlotMap::with_key(),
                z_order: SmallVec::new(),
            }),
        }
    }

    pub fn bounds(&self) -> RegionSize {
        self.bounds.get()
    }

    pub fn resize(&self, bounds: RegionSize) {
        self.bounds.set(bounds);
    }

    /// Contained children, inserted or not.
    pub fn children(&self) -> Vec<C> {
        self.state
            .borrow()
            .views
            .values()
            .map(|v| v.child.clone())
            .collect()
    }

    /// Children whose views are inserted and not hidden, back to front.
    pub fn visible(&self) -> Vec<C> {
        let state = self.state.borrow();
        state
            .z_order
            .iter()
            .filter_map(|k| state.views.get(*k))
            .filter(|v| !v.hidden)
            .map(|v| v.child.clone())
            .collect()
    }

    pub fn topmost(&self) -> Option<C> {
        self.visible().pop()
    }

    pub fn is_hidden(&self, child: &C) -> bool {
        let state = self.state.borrow();
        state
            .key_of(child)
            .and_then(|k| state.views.get(k))
            .is_some_and(|v| v.hidden)
    }

    /// Lay out every inserted view and return its frame, back to front.
    pub fn layout(&self) -> Result<Vec<(C, Rect)>, taffy::TaffyError> {
        let state = self.state.borrow();
        let bounds = self.bounds.get();

        let mut tree: TaffyTree<()> = TaffyTree::new();
        let mut nodes = Vec::with_capacity(state.z_order.len());
        for key in &state.z_order {
            let Some(view) = state.views.get(*key) else {
                continue;
            };
            let style = if view.fills {
                Style {
                    position: Position::Absolute,
                    inset: taffy::geometry::Rect {
                        left: length(0.0),
                        right: length(0.0),
                        top: length(0.0),
                        bottom: length(0.0),
                    },
                    size: Size {
                        width: percent(1.0),
                        height: percent(1.0),
                    },
                    ..Default::default()
                }
            } else {
                Style::default()
            };
            nodes.push((view.child.clone(), tree.new_leaf(style)?));
        }

        let root = tree.new_with_children(
            Style {
                size: Size {
                    width: length(bounds.width),
                    height: length(bounds.height),
                },
                ..Default::default()
            },
            &nodes.iter().map(|(_, n)| *n).collect::<Vec<_>>(),
        )?;
        tree.compute_layout(root, Size::MAX_CONTENT)?;

        nodes
            .into_iter()
            .map(|(child, node)| -> Result<(C, Rect), taffy::TaffyError> {
                let l = tree.layout(node)?;
                Ok((
                    child,
                    Rect {
                        x: l.location.x,
                        y: l.location.y,
                        w: l.size.width,
                        h: l.size.height,
                    },
                ))
            })
            .collect()
    }

    pub fn frame_of(&self, child: &C) -> Option<Rect> {
        match self.layout() {
            Ok(frames) => frames
                .into_iter()
                .find(|(c, _)| c.is_same(child))
                .map(|(_, r)| r),
            Err(e) => {
                log::warn!("region layout failed: {e:?}");
                None
            }
        }
    }
}

impl<C: ChildHandle> Surface<C> for Region<C> {
    fn adopt(&self, child: &C) {
        let mut state = self.state.borrow_mut();
        if state.key_of(child).is_none() {
            state.views.insert(HostedView {
                child: child.clone(),
                hidden: false,
                fills: false,
            });
        }
    }

    fn release(&self, child: &C) {
        let mut state = self.state.borrow_mut();
        if let Some(key) = state.key_of(child) {
            state.views.remove(key);
            state.z_order.retain(|k| *k != key);
        }
    }

    fn hosts(&self, child: &C) -> bool {
        self.state.borrow().key_of(child).is_some()
    }

    fn insert_view(&self, child: &C) {
        let mut state = self.state.borrow_mut();
        if let Some(key) = state.key_of(child) {
            state.z_order.retain(|k| *k != key);
            state.z_order.push(key);
        }
    }

    fn remove_view(&self, child: &C) {
        let mut state = self.state.borrow_mut();
        if let Some(key) = state.key_of(child) {
            state.z_order.retain(|k| *k != key);
        }
    }

    fn constrain_to_fill(&self, child: &C) {
        let mut state = self.state.borrow_mut();
        if let Some(key) = state.key_of(child) {
            state.views[key].fills = true;
        }
    }

    fn bring_to_front(&self, child: &C) {
        self.insert_view(child);
    }

    fn send_to_back(&self, child: &C) {
        let mut state = self.state.borrow_mut();
        if let Some(key) = state.key_of(child) {
            state.z_order.retain(|k| *k != key);
            state.z_order.insert(0, key);
        }
    }

    fn set_hidden(&self, child: &C, hidden: bool) {
        let mut state = self.state.borrow_mut();
        if let Some(key) = state.key_of(child) {
            state.views[key].hidden = hidden;
        }
    }
}
