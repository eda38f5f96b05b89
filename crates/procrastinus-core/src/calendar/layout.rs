//! Lane packing for one day of events.
//!
//! Overlapping events are drawn side by side in separate lanes. Events are
//! taken in start order and each goes into the first lane whose last event
//! has already ended; if none has, a new lane opens.

use serde::{Deserialize, Serialize};

use super::CalendarEvent;

/// Pack one day's events into non-overlapping lanes.
///
/// An event ending exactly when the next starts shares its lane.
pub fn layout_day(events: &[CalendarEvent]) -> Vec<Vec<CalendarEvent>> {
    let mut sorted: Vec<&CalendarEvent> = events.iter().collect();
    sorted.sort_by(|a, b| a.start_hour.total_cmp(&b.start_hour));

    let mut lanes: Vec<Vec<CalendarEvent>> = Vec::new();
    for event in sorted {
        let free = lanes.iter_mut().find(|lane| {
            lane.last()
                .is_some_and(|last| last.end_hour <= event.start_hour)
        });
        match free {
            Some(lane) => lane.push(event.clone()),
            None => lanes.push(vec![event.clone()]),
        }
    }
    lanes
}

/// Pixel scale for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutScale {
    pub pixels_per_hour: f64,
    pub lane_height: f64,
}

impl Default for LayoutScale {
    fn default() -> Self {
        Self {
            pixels_per_hour: 60.0,
            lane_height: 48.0,
        }
    }
}

/// An event with its on-screen box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBox {
    pub lane: usize,
    pub left: f64,
    pub width: f64,
    pub top: f64,
    pub event: CalendarEvent,
}

/// Lay out a day and compute each event's box against `scale`.
pub fn position_day(events: &[CalendarEvent], scale: &LayoutScale) -> Vec<EventBox> {
    layout_day(events)
        .into_iter()
        .enumerate()
        .flat_map(|(lane, lane_events)| {
            lane_events.into_iter().map(move |event| EventBox {
                lane,
                left: event.start_hour * scale.pixels_per_hour,
                width: event.duration_hours() * scale.pixels_per_hour,
                top: lane as f64 * scale.lane_height,
                event,
            })
        })
        .collect()
}
