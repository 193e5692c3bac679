//! Line selection under a row budget.

use super::line::RenderLine;

/// Pick which lines to show when they may not all fit in `budget` rows.
///
/// Running lines are always shown, even past the budget: they are what
/// the user is waiting on. Finished lines fill whatever rows remain,
/// newest (closest to the end of `lines`) first, so older finished lines
/// scroll off first. The result keeps the input order.
///
/// A budget of zero or less shows nothing.
pub fn select_lines<'a>(lines: &[&'a RenderLine], budget: i64) -> Vec<&'a str> {
    if budget <= 0 {
        return Vec::new();
    }

    let running = lines.iter().filter(|line| !line.is_terminal()).count();
    let mut finished_quota = budget.saturating_sub(i64::try_from(running).unwrap_or(i64::MAX));
    let mut running_left = running;

    let mut picked = Vec::with_capacity(lines.len().min(usize::try_from(budget).unwrap_or(0)));
    for line in lines.iter().rev() {
        if finished_quota <= 0 && running_left == 0 {
            break;
        }
        if line.is_terminal() {
            if finished_quota <= 0 {
                continue;
            }
            finished_quota -= 1;
        } else {
            running_left -= 1;
        }
        picked.push(line.display());
    }
    picked.reverse();
    picked
}
