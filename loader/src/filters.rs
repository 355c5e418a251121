use jiff::{Zoned, civil::Date};
use payloads::ProductId;

/// The day and product the user is looking at.
///
/// Either field may be empty while the user has not picked a value yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub date: Option<Date>,
    pub product_id: Option<ProductId>,
}

impl Default for Filters {
    /// Today, with no product selected.
    fn default() -> Self {
        Self {
            date: Some(Zoned::now().date()),
            product_id: None,
        }
    }
}

impl Filters {
    pub fn new(date: Option<Date>, product_id: Option<ProductId>) -> Self {
        Self { date, product_id }
    }

    /// Both the date and the product, if both are selected.
    pub fn selection(&self) -> Option<(Date, ProductId)> {
        Some((self.date?, self.product_id?))
    }

    /// Merge a partial update. Returns false, leaving the filters untouched,
    /// if the merge would not change anything.
    pub fn apply(&mut self, update: FiltersUpdate) -> bool {
        let next = Self {
            date: update.date.unwrap_or(self.date),
            product_id: update.product_id.unwrap_or(self.product_id),
        };
        if next == *self {
            return false;
        }
        *self = next;
        true
    }
}

/// A partial change to [`Filters`]. Fields left as `None` keep their
/// current value; `Some(None)` clears the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FiltersUpdate {
    pub date: Option<Option<Date>>,
    pub product_id: Option<Option<ProductId>>,
}

impl FiltersUpdate {
    pub fn date(date: Date) -> Self {
        Self {
            date: Some(Some(date)),
            ..Self::default()
        }
    }

    pub fn product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(Some(product_id)),
            ..Self::default()
        }
    }

    pub fn clear_date() -> Self {
        Self {
            date: Some(None),
            ..Self::default()
        }
    }

    pub fn clear_product() -> Self {
        Self {
            product_id: Some(None),
            ..Self::default()
        }
    }

    pub fn and_date(mut self, date: Date) -> Self {
        self.date = Some(Some(date));
        self
    }

    pub fn and_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(Some(product_id));
        self
    }
}
