use crate::components::FuelTank;

fn can_feed(tanks: &[FuelTank], index: usize) -> bool {
    tanks
        .get(index)
        .is_some_and(|tank| tank.priority && !tank.is_empty())
}

/// Whether any of the feed tanks still holds fuel
pub fn feed_available(tanks: &[FuelTank], feed: &[usize]) -> bool {
    feed.iter().any(|&i| can_feed(tanks, i))
}

/// Draw `amount` lbs evenly from the non-empty feed tanks.
///
/// A tank that cannot supply its share passes the shortfall on to the others.
/// Returns the fuel actually drawn.
pub fn draw_fuel(tanks: &mut [FuelTank], feed: &[usize], amount: f64) -> f64 {
    let mut remaining = amount.max(0.0);
    let mut drawn = 0.0;

    while remaining > 1e-12 {
        let active: Vec<usize> = feed
            .iter()
            .copied()
            .filter(|&i| can_feed(tanks, i))
            .collect();
        if active.is_empty() {
            break;
        }
        let share = remaining / active.len() as f64;
        let mut pass = 0.0;
        for i in active {
            pass += tanks[i].draw(share);
        }
        drawn += pass;
        remaining -= pass;
        if pass <= 0.0 {
            break;
        }
    }
    drawn
}
