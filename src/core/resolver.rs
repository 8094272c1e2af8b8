use crate::core::registry::RegistryIndex;
use crate::domain::model::Institution;
use std::collections::HashSet;

/// Maps an email domain to the institution that owns it.
///
/// Matching order:
/// 1. an exact registered domain wins outright;
/// 2. otherwise the first registered domain `d` (registry order) for which
///    `domain.ends_with(d) || d.ends_with(domain)` holds.
///
/// Step 2 is a plain string suffix test with no label boundary, so
/// `osc.edu` is claimed by a registered `sc.edu`, and a bare `edu` is claimed
/// by whichever institution lists an `*.edu` domain first. Results therefore
/// depend on registry order whenever registered domains overlap.
///
/// Domains proven unmatched are remembered for the lifetime of the resolver.
#[derive(Debug)]
pub struct DomainResolver<'a> {
    index: &'a RegistryIndex,
    unmatched: HashSet<String>,
}

impl<'a> DomainResolver<'a> {
    pub fn new(index: &'a RegistryIndex) -> Self {
        Self {
            index,
            unmatched: HashSet::new(),
        }
    }

    pub fn resolve(&mut self, domain: &str) -> Option<&'a Institution> {
        if domain.is_empty() || self.unmatched.contains(domain) {
            return None;
        }

        if let Some(institution) = self.index.exact(domain) {
            return Some(institution);
        }

        let found = self
            .index
            .domains()
            .find(|(registered, _)| domain.ends_with(registered) || registered.ends_with(domain))
            .map(|(_, institution)| institution);

        if found.is_none() {
            tracing::trace!("Domain {} matches no institution", domain);
            self.unmatched.insert(domain.to_string());
        }
        found
    }

    pub fn cached_unmatched(&self) -> usize {
        self.unmatched.len()
    }
}

/// Email domain: everything after the final `@`.
pub fn email_domain(email: &str) -> &str {
    email.rsplit('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo_bar_registry() -> RegistryIndex {
        RegistryIndex::new(vec![
            Institution::new("Foo Univ", &["foo.edu", "cs.foo.edu"]),
            Institution::new("Bar Univ", &["bar.ac.cn"]),
        ])
    }

    #[test]
    fn test_exact_suffix_and_unmatched() {
        let index = foo_bar_registry();
        let mut resolver = DomainResolver::new(&index);

        assert_eq!(resolver.resolve("cs.foo.edu").unwrap().name, "Foo Univ");
        assert_eq!(resolver.resolve("mail.foo.edu").unwrap().name, "Foo Univ");
        assert_eq!(resolver.resolve("bar.ac.cn").unwrap().name, "Bar Univ");
        assert!(resolver.resolve("unknown.org").is_none());
    }

    #[test]
    fn test_empty_domain_is_unmatched() {
        let index = foo_bar_registry();
        let mut resolver = DomainResolver::new(&index);
        assert!(resolver.resolve("").is_none());
    }

    #[test]
    fn test_exact_match_beats_earlier_suffix_match() {
        // "cs.foo.edu" also ends with "foo.edu" of the first institution,
        // but the exact owner comes later in the registry.
        let index = RegistryIndex::new(vec![
            Institution::new("Foo Univ", &["foo.edu"]),
            Institution::new("Foo CS Institute", &["cs.foo.edu"]),
        ]);
        let mut resolver = DomainResolver::new(&index);

        assert_eq!(resolver.resolve("cs.foo.edu").unwrap().name, "Foo CS Institute");
        assert_eq!(resolver.resolve("ai.cs.foo.edu").unwrap().name, "Foo Univ");
    }

    #[test]
    fn test_suffix_match_has_no_label_boundary() {
        let index = RegistryIndex::new(vec![Institution::new("South Carolina", &["sc.edu"])]);
        let mut resolver = DomainResolver::new(&index);

        assert_eq!(resolver.resolve("osc.edu").unwrap().name, "South Carolina");
    }

    #[test]
    fn test_reverse_suffix_claims_parent_domain() {
        let index = RegistryIndex::new(vec![
            Institution::new("Alpha", &["alpha.edu"]),
            Institution::new("Beta", &["beta.edu"]),
        ]);
        let mut resolver = DomainResolver::new(&index);

        assert_eq!(resolver.resolve("edu").unwrap().name, "Alpha");
        assert_eq!(resolver.resolve("a.edu").unwrap().name, "Alpha");
    }

    #[test]
    fn test_suffix_winner_depends_on_registry_order() {
        let forward = RegistryIndex::new(vec![
            Institution::new("Alpha", &["alpha.edu"]),
            Institution::new("Beta", &["beta.edu"]),
        ]);
        let reversed = RegistryIndex::new(vec![
            Institution::new("Beta", &["beta.edu"]),
            Institution::new("Alpha", &["alpha.edu"]),
        ]);

        assert_eq!(DomainResolver::new(&forward).resolve("edu").unwrap().name, "Alpha");
        assert_eq!(DomainResolver::new(&reversed).resolve("edu").unwrap().name, "Beta");
    }

    #[test]
    fn test_resolution_is_idempotent_and_caches_misses() {
        let index = foo_bar_registry();
        let mut resolver = DomainResolver::new(&index);

        let first = resolver.resolve("mail.foo.edu").map(|i| i.name.clone());
        let second = resolver.resolve("mail.foo.edu").map(|i| i.name.clone());
        assert_eq!(first, second);

        assert!(resolver.resolve("example.com").is_none());
        assert!(resolver.resolve("example.com").is_none());
        assert_eq!(resolver.cached_unmatched(), 1);
    }

    #[test]
    fn test_email_domain_uses_final_at() {
        assert_eq!(email_domain("a@foo.edu"), "foo.edu");
        assert_eq!(email_domain("weird@name@cs.foo.edu"), "cs.foo.edu");
        assert_eq!(email_domain("no-at-sign"), "no-at-sign");
    }
}
