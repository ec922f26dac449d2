use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::response::Meta;

#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, default 1
    pub page: Option<i64>,
    /// Items per page, default 20, at most 100
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }

    /// Cuts one page out of `items` and describes it.
    pub fn apply<T>(&self, items: Vec<T>) -> (Vec<T>, Meta) {
        let (page, per_page, offset) = self.normalize();
        let total = items.len() as i64;
        let items = items
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(per_page).unwrap_or(usize::MAX))
            .collect();
        (items, Meta::new(page, per_page, total))
    }
}

/// Query string for listing orders. Kept flat because query-string values
/// do not survive `#[serde(flatten)]` as numbers.
#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// One of NEW, IN_PROCESS, SENT, COMPLETED
    pub status: Option<String>,
    pub customer_id: Option<Uuid>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_inputs() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(p.normalize(), (1, 100, 0));
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
    }

    #[test]
    fn apply_slices_the_requested_page() {
        let p = Pagination {
            page: Some(2),
            per_page: Some(3),
        };
        let (items, meta) = p.apply((1..=7).collect::<Vec<_>>());
        assert_eq!(items, vec![4, 5, 6]);
        assert_eq!(meta, Meta::new(2, 3, 7));
    }

    #[test]
    fn huge_page_yields_an_empty_page() {
        let p = Pagination {
            page: Some(i64::MAX),
            per_page: Some(100),
        };
        assert_eq!(p.normalize(), (i64::MAX, 100, i64::MAX));

        let (items, meta) = p.apply(vec![1, 2, 3]);
        assert!(items.is_empty());
        assert_eq!(meta, Meta::new(i64::MAX, 100, 3));
    }
}
