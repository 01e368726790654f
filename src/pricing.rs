//! Money math shared by the cart and checkout handlers. Totals are always
//! recomputed from the current line items, never cached.

pub const TAX_RATE: f32 = 0.10;

/// Assumed cost share of an order's subtotal, used for the owner dashboard.
pub const COST_RATIO: f32 = 0.40;

/// Price of one cart/order line. A line whose product has gone missing
/// contributes nothing instead of poisoning the total.
pub fn line_total(price: Option<f32>, quantity: u32) -> f32 {
    price.unwrap_or(0.0) * quantity as f32
}

pub fn cart_total<I>(lines: I) -> f32
where
    I: IntoIterator<Item = (Option<f32>, u32)>,
{
    lines
        .into_iter()
        .map(|(price, quantity)| line_total(price, quantity))
        .sum()
}

pub fn with_tax(subtotal: f32) -> f32 {
    subtotal + subtotal * TAX_RATE
}

pub fn profit(revenue: f32, subtotal_sum: f32) -> f32 {
    revenue - subtotal_sum * COST_RATIO
}
