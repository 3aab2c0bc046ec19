//! Message rendering and recipient normalization.

/// Placeholder replaced with the order number.
pub const ORDER_NUMBER_PLACEHOLDER: &str = "{order_number}";

/// Replace every `{order_number}` in `template` with `order_number`.
///
/// A template without the placeholder is returned unchanged.
pub fn render(template: &str, order_number: &str) -> String {
    template.replace(ORDER_NUMBER_PLACEHOLDER, order_number)
}

/// Strip a single leading `+` from a billing phone.
pub fn normalize_recipient(billing_phone: &str) -> &str {
    billing_phone.strip_prefix('+').unwrap_or(billing_phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_placeholder() {
        assert_eq!(render("Order #{order_number} done", "1042"), "Order #1042 done");
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        assert_eq!(
            render("{order_number}/{order_number} ref {order_number}", "7"),
            "7/7 ref 7"
        );
    }

    #[test]
    fn test_render_without_placeholder_is_noop() {
        let template = "Thanks for shopping {with} us! {order} #";
        assert_eq!(render(template, "1042"), template);
    }

    #[test]
    fn test_render_keeps_surrounding_text() {
        // Near-miss braces and unicode around the placeholder stay intact
        assert_eq!(
            render("طلبك {order_number} {order_number", "55"),
            "طلبك 55 {order_number"
        );
    }

    #[test]
    fn test_render_order_number_containing_placeholder() {
        assert_eq!(render("#{order_number}", "{order_number}"), "#{order_number}");
    }

    #[test]
    fn test_normalize_strips_one_plus() {
        assert_eq!(normalize_recipient("+96550000000"), "96550000000");
    }

    #[test]
    fn test_normalize_without_plus_unchanged() {
        assert_eq!(normalize_recipient("96550000000"), "96550000000");
        assert_eq!(normalize_recipient(""), "");
    }

    #[test]
    fn test_normalize_keeps_extra_pluses() {
        assert_eq!(normalize_recipient("++123"), "+123");
        assert_eq!(normalize_recipient("12+3"), "12+3");
    }
}
