use crate::models::transaction::Transaction;
use std::cmp::Ordering;

pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Date,
    Title,
}

impl SortColumn {
    fn column_name(self) -> &'static str {
        match self {
            SortColumn::Date => "date",
            SortColumn::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(column: SortColumn) -> Self {
        Self { column, direction: SortDirection::Ascending }
    }

    pub fn desc(column: SortColumn) -> Self {
        Self { column, direction: SortDirection::Descending }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = match self.column {
            SortColumn::Date => a.date.cmp(&b.date),
            SortColumn::Title => a.title.cmp(&b.title),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// A read-only select against the `transactions` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub limit: usize,
    pub order: Vec<OrderBy>,
}

impl TransactionQuery {
    /// Newest first, titles alphabetical within the same timestamp.
    pub fn recent() -> Self {
        Self {
            limit: RECENT_LIMIT,
            order: vec![OrderBy::desc(SortColumn::Date), OrderBy::asc(SortColumn::Title)],
        }
    }

    /// PostgREST `order` parameter, e.g. `date.desc,title.asc`.
    pub fn order_param(&self) -> String {
        self.order
            .iter()
            .map(|o| {
                let direction = match o.direction {
                    SortDirection::Ascending => "asc",
                    SortDirection::Descending => "desc",
                };
                format!("{}.{}", o.column.column_name(), direction)
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("select", "*".to_string()),
            ("order", self.order_param()),
            ("limit", self.limit.to_string()),
        ]
    }

    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        self.order
            .iter()
            .fold(Ordering::Equal, |acc, o| acc.then_with(|| o.compare(a, b)))
    }

    /// Sorts and truncates locally, with the same result the store gives.
    pub fn apply(&self, mut rows: Vec<Transaction>) -> Vec<Transaction> {
        rows.sort_by(|a, b| self.compare(a, b));
        rows.truncate(self.limit);
        rows
    }
}
