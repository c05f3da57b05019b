//! # Page Break Decisions
//!
//! When a block of text lines does not fit in what is left of the page,
//! decide whether to place it whole, split it, or move it whole to the next
//! page. The first item of a row carries its label, so it is never split
//! away from the first line of the value.

/// Decide what to do with a block that may not fit on the current page.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Everything fits; place it all here.
    Place,
    /// Nothing fits; start the block on the next page.
    MoveToNextPage,
    /// Place the first `items_on_current_page` items here, the rest after a
    /// page break.
    Split { items_on_current_page: usize },
}

/// Given the space left above the break line and the height of each item
/// in a block, decide how to break.
pub fn decide_break(remaining_height: f64, item_heights: &[f64]) -> BreakDecision {
    let total: f64 = item_heights.iter().sum();
    if total <= remaining_height + f64::EPSILON {
        return BreakDecision::Place;
    }

    let mut running = 0.0;
    let mut fit_count = 0;
    for &h in item_heights {
        if running + h > remaining_height + f64::EPSILON {
            break;
        }
        running += h;
        fit_count += 1;
    }

    if fit_count == 0 {
        BreakDecision::MoveToNextPage
    } else {
        BreakDecision::Split {
            items_on_current_page: fit_count,
        }
    }
}

/// True when the cursor has run past `page_height - margin - footprint`,
/// i.e. a block needing `footprint` below the cursor should start on a new
/// page.
pub fn past_break_line(y: f64, page_height: f64, margin: f64, footprint: f64) -> bool {
    y > page_height - margin - footprint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits() {
        assert_eq!(decide_break(100.0, &[6.0, 3.0, 3.0]), BreakDecision::Place);
    }

    #[test]
    fn exact_fit_places() {
        assert_eq!(decide_break(12.0, &[6.0, 3.0, 3.0]), BreakDecision::Place);
    }

    #[test]
    fn split_at_right_point() {
        // label+first line (6) and two more lines (3 + 3) fit in 13
        let heights = [6.0, 3.0, 3.0, 3.0, 3.0];
        assert_eq!(
            decide_break(13.0, &heights),
            BreakDecision::Split {
                items_on_current_page: 3,
            }
        );
    }

    #[test]
    fn first_item_too_tall_moves() {
        assert_eq!(decide_break(5.0, &[6.0, 3.0]), BreakDecision::MoveToNextPage);
        assert_eq!(decide_break(-2.0, &[3.0]), BreakDecision::MoveToNextPage);
    }

    #[test]
    fn break_line() {
        assert!(!past_break_line(261.0, 279.4, 8.0, 10.0));
        assert!(past_break_line(262.0, 279.4, 8.0, 10.0));
    }
}
