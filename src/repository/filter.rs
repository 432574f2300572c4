#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub keyword: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub sql: String,
    pub binds: Vec<String>,
}

impl WhereClause {
    pub fn next_placeholder(&self) -> usize {
        self.binds.len() + 1
    }
}

impl ListingFilter {
    pub fn new(keyword: Option<&str>, category: Option<&str>) -> Self {
        let keyword = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned);
        let category = category.filter(|c| !c.is_empty()).map(str::to_owned);
        Self { keyword, category }
    }

    pub fn keyword_echo(&self) -> String {
        self.keyword.clone().unwrap_or_default()
    }

    /// User input only ever travels through `binds`.
    pub fn where_clause(&self) -> WhereClause {
        let mut sql = String::from("WHERE TRUE");
        let mut binds = Vec::new();

        if let Some(keyword) = &self.keyword {
            binds.push(format!("%{}%", escape_like(keyword)));
            sql.push_str(&format!(" AND p.name ILIKE ${}", binds.len()));
        }

        if let Some(category) = &self.category {
            binds.push(category.clone());
            sql.push_str(&format!(" AND c.category_name = ${}", binds.len()));
        }

        WhereClause { sql, binds }
    }
}

fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
