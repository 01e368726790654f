use surgistore::pricing;

#[test]
fn test_line_total_coerces_missing_price_to_zero() {
    assert_eq!(pricing::line_total(None, 7), 0.0);
    assert_eq!(pricing::line_total(Some(2.5), 4), 10.0);
    assert_eq!(pricing::line_total(Some(9.99), 0), 0.0);
}

#[test]
fn test_cart_total_is_sum_of_lines() {
    let lines = vec![(Some(10.00f32), 2u32), (Some(5.50), 1)];
    let total = pricing::cart_total(lines);
    assert!((total - 25.50).abs() < 1e-4);
}

#[test]
fn test_cart_total_skips_lines_without_product() {
    let lines = vec![(Some(10.00f32), 2u32), (None, 3), (Some(5.50), 1)];
    let total = pricing::cart_total(lines);
    assert!((total - 25.50).abs() < 1e-4);
}

#[test]
fn test_empty_cart_totals_zero() {
    assert_eq!(pricing::cart_total(Vec::new()), 0.0);
}

#[test]
fn test_ten_percent_tax() {
    let total = pricing::with_tax(25.50);
    assert!((total - 28.05).abs() < 1e-4);
    assert_eq!(pricing::with_tax(0.0), 0.0);
}

#[test]
fn test_profit_subtracts_cost_share() {
    // revenue 22.00 on a 20.00 subtotal, cost assumed at 40% of subtotal.
    let profit = pricing::profit(22.0, 20.0);
    assert!((profit - 14.0).abs() < 1e-4);
}
