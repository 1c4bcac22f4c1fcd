use serde::{Deserialize, Serialize};

use crate::model::folder::FolderId;

/// Fraction of the row height occupied by the "insert before" band
const BEFORE_BAND: f64 = 0.25;
/// Fraction of the row height where the "insert after" band begins
const AFTER_BAND: f64 = 0.75;

/// The placement a drop would perform, inferred from pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropIntent {
    /// Insert as the sibling immediately before the hovered row
    Before,
    /// Insert as the sibling immediately after the hovered row
    After,
    /// Reparent as a child of the hovered row
    Inside,
}

/// Classify pointer position over a candidate row.
///
/// The top quarter of the row means "insert before", the bottom quarter
/// "insert after", and the middle half "reparent inside". The band
/// boundaries themselves fall in the middle band. Stateless; the caller
/// re-runs this on every pointer-move tick.
pub fn classify_drop_intent(pointer_y: f64, row_top: f64, row_height: f64) -> DropIntent {
    let y = pointer_y - row_top;
    if y < BEFORE_BAND * row_height {
        DropIntent::Before
    } else if y > AFTER_BAND * row_height {
        DropIntent::After
    } else {
        DropIntent::Inside
    }
}

/// Drag gesture lifecycle.
///
/// One value per gesture: `Idle` until a drag handle is grabbed, `Dragging`
/// while the pointer is over no usable row, `Hovering` while a candidate
/// row and its classified intent are tracked for the drop indicator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        moved: FolderId,
    },
    Hovering {
        moved: FolderId,
        target: FolderId,
        intent: DropIntent,
    },
}

impl DragState {
    /// The id being dragged, in any non-idle state
    pub fn moved_id(&self) -> Option<&FolderId> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { moved } | DragState::Hovering { moved, .. } => Some(moved),
        }
    }

    /// The `(target, intent)` pair driving the drop indicator
    pub fn indicator(&self) -> Option<(&FolderId, DropIntent)> {
        match self {
            DragState::Hovering { target, intent, .. } => Some((target, *intent)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_edge_is_before() {
        assert_eq!(classify_drop_intent(0.0, 0.0, 32.0), DropIntent::Before);
    }

    #[test]
    fn bottom_edge_is_after() {
        assert_eq!(classify_drop_intent(32.0, 0.0, 32.0), DropIntent::After);
    }

    #[test]
    fn midpoint_is_inside() {
        assert_eq!(classify_drop_intent(16.0, 0.0, 32.0), DropIntent::Inside);
    }

    #[test]
    fn band_boundaries_resolve_to_inside() {
        // Exactly 25% and 75% fall in the middle band.
        assert_eq!(classify_drop_intent(8.0, 0.0, 32.0), DropIntent::Inside);
        assert_eq!(classify_drop_intent(24.0, 0.0, 32.0), DropIntent::Inside);
    }

    #[test]
    fn row_top_offset_is_subtracted() {
        assert_eq!(classify_drop_intent(101.0, 100.0, 32.0), DropIntent::Before);
        assert_eq!(classify_drop_intent(131.0, 100.0, 32.0), DropIntent::After);
    }

    #[test]
    fn indicator_only_while_hovering() {
        let idle = DragState::Idle;
        assert_eq!(idle.indicator(), None);

        let hovering = DragState::Hovering {
            moved: "a".into(),
            target: "b".into(),
            intent: DropIntent::Inside,
        };
        let (target, intent) = hovering.indicator().unwrap();
        assert_eq!(target, "b");
        assert_eq!(intent, DropIntent::Inside);
    }
}
