/*
[INPUT]:  Rendering commands from the map session
[OUTPUT]: Map state (center, markers, popup, notifications)
[POS]:    View layer - rendering seam between the session and a concrete map
[UPDATE]: When adding rendering commands or annotation fields
*/

use std::collections::BTreeMap;

use helper_map_adapter::{Coordinate, Task};
use rust_decimal::Decimal;

use crate::distance::{haversine_km, round_km};

/// How strongly a new center is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterMode {
    /// Recenter and reset zoom (live fix).
    Force,
    /// Pan only; keeps the user's zoom (fallback fix, highlight).
    Soft,
}

/// Marker for one task, with its distance from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub task_id: i64,
    pub position: Coordinate,
    pub title: String,
    pub description: String,
    pub reward: Decimal,
    /// Kilometers from the user, rounded to two decimals.
    pub distance_km: f64,
}

impl Annotation {
    pub fn for_task(task: &Task, origin: Coordinate) -> Self {
        Self {
            task_id: task.id,
            position: task.coordinate(),
            title: task.title.clone(),
            description: task.description.clone(),
            reward: task.reward,
            distance_km: round_km(haversine_km(origin, task.coordinate())),
        }
    }

    pub fn popup_text(&self) -> String {
        format!(
            "{}\nDescription: {}\nReward: ${}\nDistance: {:.2} km",
            self.title, self.description, self.reward, self.distance_km
        )
    }
}

/// What the single open popup is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    User,
    Task(i64),
}

/// Rendering surface driven by the map session.
pub trait MapView: Send {
    fn set_view(&mut self, center: Coordinate, zoom: u8, mode: CenterMode);

    /// Place the "You are here!" marker and open its popup.
    fn place_user_marker(&mut self, at: Coordinate);

    fn add_annotation(&mut self, annotation: Annotation);

    fn remove_annotation(&mut self, task_id: i64);

    fn open_popup(&mut self, task_id: i64);

    fn close_popup(&mut self);

    /// User-visible alert.
    fn notify(&mut self, message: &str);
}

/// Headless map that records its state.
#[derive(Debug, Default, Clone)]
pub struct MemoryMap {
    pub center: Option<(Coordinate, u8, CenterMode)>,
    pub user_marker: Option<Coordinate>,
    pub annotations: BTreeMap<i64, Annotation>,
    pub popup: Option<Popup>,
    pub notifications: Vec<String>,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annotation_ids(&self) -> Vec<i64> {
        self.annotations.keys().copied().collect()
    }
}

impl MapView for MemoryMap {
    fn set_view(&mut self, center: Coordinate, zoom: u8, mode: CenterMode) {
        let zoom = match (mode, self.center) {
            (CenterMode::Soft, Some((_, current, _))) => current,
            _ => zoom,
        };
        self.center = Some((center, zoom, mode));
    }

    fn place_user_marker(&mut self, at: Coordinate) {
        self.user_marker = Some(at);
        self.popup = Some(Popup::User);
    }

    fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.insert(annotation.task_id, annotation);
    }

    fn remove_annotation(&mut self, task_id: i64) {
        self.annotations.remove(&task_id);
        if self.popup == Some(Popup::Task(task_id)) {
            self.popup = None;
        }
    }

    fn open_popup(&mut self, task_id: i64) {
        if self.annotations.contains_key(&task_id) {
            self.popup = Some(Popup::Task(task_id));
        }
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}
