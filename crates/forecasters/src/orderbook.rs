use core_types::OrderBookEntry;

/// The average listing gap that counts as a fully thin book.
pub const REFERENCE_GAP: f64 = 0.2;

/// How thin the order book is above the cheapest listing, in [0, 1].
///
/// Listing prices are sorted and the mean relative gap between neighbours is divided by
/// [`REFERENCE_GAP`]. Fewer than two usable listings score 0.
pub fn gap_score(order_book: &[OrderBookEntry]) -> f64 {
    let mut prices: Vec<f64> = order_book
        .iter()
        .map(|entry| entry.price)
        .filter(|price| price.is_finite() && *price > 0.0)
        .collect();
    if prices.len() < 2 {
        return 0.0;
    }
    prices.sort_by(|a, b| a.total_cmp(b));

    let gaps: Vec<f64> = prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
    let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
    (mean_gap / REFERENCE_GAP).clamp(0.0, 1.0)
}
