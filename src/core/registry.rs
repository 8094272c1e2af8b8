use crate::domain::model::Institution;
use crate::utils::error::{Result, StatsError};
use std::collections::HashMap;

/// Lookup structure over the institution registry.
///
/// Exact lookups go through a hash map. When several institutions list the
/// same domain the first registered one owns it. Suffix matching walks
/// `domains()` which yields every `(domain, institution)` pair in registry
/// order, duplicates included, so that scan order matches the raw list.
#[derive(Debug, Clone, Default)]
pub struct RegistryIndex {
    institutions: Vec<Institution>,
    exact: HashMap<String, usize>,
    ordered: Vec<(String, usize)>,
}

impl RegistryIndex {
    pub fn new(institutions: Vec<Institution>) -> Self {
        let mut exact = HashMap::new();
        let mut ordered = Vec::new();

        for (position, institution) in institutions.iter().enumerate() {
            for domain in &institution.domains {
                exact.entry(domain.clone()).or_insert(position);
                ordered.push((domain.clone(), position));
            }
        }

        tracing::debug!(
            "Indexed {} institutions, {} distinct domains",
            institutions.len(),
            exact.len()
        );

        Self {
            institutions,
            exact,
            ordered,
        }
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(parse_registry(bytes)?))
    }

    pub fn exact(&self, domain: &str) -> Option<&Institution> {
        self.exact.get(domain).map(|&i| &self.institutions[i])
    }

    pub fn domains(&self) -> impl Iterator<Item = (&str, &Institution)> {
        self.ordered
            .iter()
            .map(|(domain, i)| (domain.as_str(), &self.institutions[*i]))
    }

    pub fn len(&self) -> usize {
        self.institutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.institutions.is_empty()
    }
}

/// 解析機構清單 JSON，缺少 `name` 或 `domains` 的條目直接報錯
pub fn parse_registry(bytes: &[u8]) -> Result<Vec<Institution>> {
    let raw: serde_json::Value = serde_json::from_slice(bytes)?;
    let serde_json::Value::Array(items) = raw else {
        return Err(StatsError::RegistryUnavailable {
            message: "registry document is not a JSON array".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_institution(index, item))
        .collect()
}

fn parse_institution(index: usize, item: serde_json::Value) -> Result<Institution> {
    let malformed = |reason: &str| StatsError::MalformedRegistryEntry {
        index,
        reason: reason.to_string(),
    };

    let serde_json::Value::Object(mut fields) = item else {
        return Err(malformed("entry is not an object"));
    };

    let name = match fields.remove("name") {
        Some(serde_json::Value::String(name)) => name,
        Some(_) => return Err(malformed("'name' is not a string")),
        None => return Err(malformed("missing 'name'")),
    };

    let domains = match fields.remove("domains") {
        Some(serde_json::Value::Array(values)) => values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::String(d) => Ok(d),
                _ => Err(malformed(&format!("'domains' of '{}' contains a non-string", name))),
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => return Err(malformed(&format!("'domains' of '{}' is not an array", name))),
        None => return Err(malformed(&format!("missing 'domains' for '{}'", name))),
    };

    Ok(Institution {
        name,
        domains,
        extra: fields,
    })
}
