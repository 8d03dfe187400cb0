pub const FEED_COLUMNS: [&str; 5] = ["id", "date", "title", "content", "tags"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub columns: Vec<String>,
    pub filters: Vec<(String, String)>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    /// Public rows, newest first, capped at `limit`.
    pub fn public_feed(limit: usize) -> Self {
        Self {
            columns: FEED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            filters: vec![("is_public".to_string(), "true".to_string())],
            order: Some(Order {
                column: "date".to_string(),
                descending: true,
            }),
            limit: Some(limit),
        }
    }

    /// PostgREST query-string pairs for this query.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.join(","))];

        for (field, value) in &self.filters {
            params.push((field.clone(), format!("eq.{value}")));
        }

        if let Some(order) = &self.order {
            let direction = if order.descending { "desc" } else { "asc" };
            params.push(("order".to_string(), format!("{}.{direction}", order.column)));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}
