//! Values derived from an order's product association set.
//!
//! Callers pass the products currently linked to the order; nothing here is
//! cached, so every call reflects the association set it is given.

use rust_decimal::Decimal;

use crate::{models::Product, validation::PRICE_DECIMAL_PLACES};

/// Exact sum of the product prices. An empty set yields `0.00`.
pub fn calculate_total_price<'a, I>(products: I) -> Decimal
where
    I: IntoIterator<Item = &'a Product>,
{
    products
        .into_iter()
        .fold(Decimal::new(0, PRICE_DECIMAL_PLACES), |total, product| {
            total + product.price
        })
}

/// True when every product is available, including when there are none.
pub fn can_be_fulfilled<'a, I>(products: I) -> bool
where
    I: IntoIterator<Item = &'a Product>,
{
    products.into_iter().all(|product| product.available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn product(price: Decimal, available: bool) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Temporary product".into(),
            price,
            available,
        }
    }

    #[test]
    fn total_of_no_products_is_zero_cents() {
        let none: [Product; 0] = [];
        let total = calculate_total_price(&none);
        assert_eq!(total, Decimal::ZERO);
        assert_eq!(total.to_string(), "0.00");
    }

    #[test]
    fn total_is_exact_to_the_cent() {
        let products = [product(dec!(1.00), true), product(dec!(4.99), true)];
        assert_eq!(calculate_total_price(&products), dec!(5.99));

        let products = [product(dec!(9.99), true), product(dec!(1.99), true)];
        assert_eq!(calculate_total_price(&products).to_string(), "11.98");
    }

    #[test]
    fn many_small_prices_do_not_drift() {
        let products: Vec<_> = (0..1000).map(|_| product(dec!(0.10), true)).collect();
        assert_eq!(calculate_total_price(&products), dec!(100.00));
    }

    #[test]
    fn empty_order_can_be_fulfilled() {
        let none: Vec<Product> = Vec::new();
        assert!(can_be_fulfilled(&none));
    }

    #[test]
    fn one_unavailable_product_blocks_fulfillment() {
        let products = [product(dec!(1.00), true), product(dec!(12.35), false)];
        assert!(!can_be_fulfilled(&products));
    }

    #[test]
    fn all_available_products_can_be_fulfilled() {
        let products = [product(dec!(1.00), true), product(dec!(4.99), true)];
        assert!(can_be_fulfilled(&products));
    }
}
