//! Picks the drop target for a drag from pointer geometry.
//!
//! Three strategies are tried in order and the first non-empty one wins:
//!
//! 1. [`CollisionTier::PointerWithin`]: task regions containing the pointer.
//!    Gives a precise insertion slot when hovering over cards.
//! 2. [`CollisionTier::RectIntersection`]: column regions overlapping the
//!    dragged rectangle. Covers empty columns and gaps between cards.
//! 3. [`CollisionTier::ClosestCenter`]: the region whose center is nearest
//!    the dragged rectangle's center, across every region.
//!
//! The last tier always yields a target while at least one region exists.

use serde::{Deserialize, Serialize};

use crate::resolver::DropTarget;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Edges count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let width = self.right().min(other.right()) - self.x.max(other.x);
        let height = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if width <= 0.0 || height <= 0.0 {
            0.0
        } else {
            width * height
        }
    }

    /// Intersection over union, `0.0..=1.0`.
    pub fn intersection_ratio(&self, other: &Rect) -> f64 {
        let intersection = self.intersection_area(other);
        if intersection == 0.0 {
            return 0.0;
        }
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

/// A region something can be dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Droppable {
    pub target: DropTarget,
    pub rect: Rect,
}

impl Droppable {
    pub fn task(task_id: crate::TaskId, rect: Rect) -> Self {
        Self {
            target: DropTarget::Task(task_id),
            rect,
        }
    }

    pub fn column(column_id: crate::ColumnId, rect: Rect) -> Self {
        Self {
            target: DropTarget::Column(column_id),
            rect,
        }
    }

    pub fn is_task(&self) -> bool {
        matches!(self.target, DropTarget::Task(_))
    }

    pub fn is_column(&self) -> bool {
        matches!(self.target, DropTarget::Column(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionTier {
    PointerWithin,
    RectIntersection,
    ClosestCenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub target: DropTarget,
    pub tier: CollisionTier,
}

/// Task regions containing the pointer, nearest center first.
pub fn pointer_within(pointer: Point, droppables: &[Droppable]) -> Vec<&Droppable> {
    let mut hits: Vec<(&Droppable, f64)> = droppables
        .iter()
        .filter(|d| d.is_task() && d.rect.contains(pointer))
        .map(|d| (d, pointer.distance_to(d.rect.center())))
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits.into_iter().map(|(d, _)| d).collect()
}

/// Column regions overlapping `active`, largest overlap ratio first.
pub fn rect_intersection(active: Rect, droppables: &[Droppable]) -> Vec<&Droppable> {
    let mut hits: Vec<(&Droppable, f64)> = droppables
        .iter()
        .filter(|d| d.is_column())
        .map(|d| (d, active.intersection_ratio(&d.rect)))
        .filter(|(_, ratio)| *ratio > 0.0)
        .collect();
    hits.sort_by(|a, b| b.1.total_cmp(&a.1));
    hits.into_iter().map(|(d, _)| d).collect()
}

/// Every region, nearest center to `active`'s center first.
pub fn closest_center(active: Rect, droppables: &[Droppable]) -> Vec<&Droppable> {
    let origin = active.center();
    let mut all: Vec<(&Droppable, f64)> = droppables
        .iter()
        .map(|d| (d, origin.distance_to(d.rect.center())))
        .collect();
    all.sort_by(|a, b| a.1.total_cmp(&b.1));
    all.into_iter().map(|(d, _)| d).collect()
}

/// Select exactly one drop target, or `None` when there are no regions.
pub fn resolve_collision(
    pointer: Point,
    active_rect: Rect,
    droppables: &[Droppable],
) -> Option<Collision> {
    let tiers: [(CollisionTier, Vec<&Droppable>); 3] = [
        (CollisionTier::PointerWithin, pointer_within(pointer, droppables)),
        (
            CollisionTier::RectIntersection,
            rect_intersection(active_rect, droppables),
        ),
        (
            CollisionTier::ClosestCenter,
            closest_center(active_rect, droppables),
        ),
    ];

    tiers.into_iter().find_map(|(tier, hits)| {
        hits.first().map(|d| Collision {
            target: d.target,
            tier,
        })
    })
}
