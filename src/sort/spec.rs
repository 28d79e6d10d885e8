//! Sort specification and token resolution.

use std::fmt;

use super::errors::{SortError, SortResult};
use super::order::OrderTerm;
use super::random::fresh_seed;
use super::registry::{SortRegistry, SortableDescriptor};
use crate::predicate::Expr;
use crate::value::ValueType;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One resolved key of a sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Request-facing name
    pub name: String,
    pub expr: Expr,
    pub value_type: ValueType,
    pub nullable: bool,
    pub direction: SortDirection,
}

impl SortKey {
    fn from_descriptor(desc: &SortableDescriptor, direction: SortDirection) -> Self {
        Self {
            name: desc.name.clone(),
            expr: Expr::column(&desc.column),
            value_type: desc.value_type,
            nullable: desc.nullable,
            direction,
        }
    }

    /// Storage column read from result rows
    pub fn column(&self) -> &str {
        match &self.expr {
            Expr::Column(c) => c,
            Expr::SeededHash { column, .. } => column,
        }
    }

    /// The token that reproduces this key (`name` or `-name`)
    pub fn token(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.name.clone(),
            SortDirection::Desc => format!("-{}", self.name),
        }
    }
}

/// A seeded shuffle; the seed is carried by the client between pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSort {
    pub seed: u64,
}

impl RandomSort {
    /// The token that pins this shuffle (`random:<seed>`)
    pub fn token(&self) -> String {
        format!("random:{}", self.seed)
    }
}

/// A resolved, total sort order.
///
/// Invariant: when `random` is set, `keys` is empty. The primary key is
/// always the final ascending tie-break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
    primary_key: SortKey,
    random: Option<RandomSort>,
}

impl SortSpec {
    /// Sort by explicit keys, then the primary key
    pub fn by_keys(keys: Vec<SortKey>, primary_key: &SortableDescriptor) -> Self {
        Self {
            keys,
            primary_key: SortKey::from_descriptor(primary_key, SortDirection::Asc),
            random: None,
        }
    }

    /// Seeded shuffle over the primary key
    pub fn random(seed: u64, primary_key: &SortableDescriptor) -> Self {
        Self {
            keys: Vec::new(),
            primary_key: SortKey::from_descriptor(primary_key, SortDirection::Asc),
            random: Some(RandomSort { seed }),
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn primary_key(&self) -> &SortKey {
        &self.primary_key
    }

    pub fn random_seed(&self) -> Option<u64> {
        self.random.map(|r| r.seed)
    }

    pub fn is_random(&self) -> bool {
        self.random.is_some()
    }

    /// Number of values a cursor for this sort carries
    pub fn cursor_arity(&self) -> usize {
        if self.random.is_some() {
            2
        } else {
            self.keys.len() + 1
        }
    }

    /// The ORDER BY sequence, including the primary-key tie-break
    pub fn order_by(&self) -> Vec<OrderTerm> {
        let pk = OrderTerm::from_key(&self.primary_key);
        match self.random {
            Some(RandomSort { seed }) => vec![
                OrderTerm {
                    expr: Expr::SeededHash {
                        seed,
                        column: self.primary_key.column().to_string(),
                    },
                    value_type: ValueType::Int,
                    nullable: false,
                    direction: SortDirection::Asc,
                },
                pk,
            ],
            None => self
                .keys
                .iter()
                .map(OrderTerm::from_key)
                .chain(std::iter::once(pk))
                .collect(),
        }
    }

    /// Tokens that reproduce this sort, used when pinning page links
    pub fn tokens(&self) -> Vec<String> {
        match self.random {
            Some(random) => vec![random.token()],
            None => self.keys.iter().map(SortKey::token).collect(),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.order_by().iter().map(ToString::to_string).collect();
        f.write_str(&terms.join(", "))
    }
}

enum Token {
    Key(String, SortDirection),
    Random(Option<u64>),
}

fn parse_token(raw: &str) -> SortResult<Token> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(SortError::invalid_token(raw, "empty sort key"));
    }
    if token.eq_ignore_ascii_case("random") {
        return Ok(Token::Random(None));
    }
    if let Some((head, tail)) = token.split_once(':') {
        if head.eq_ignore_ascii_case("random") {
            let seed = tail
                .parse::<u64>()
                .map_err(|_| SortError::invalid_token(raw, "random seed must be an unsigned integer"))?;
            return Ok(Token::Random(Some(seed)));
        }
        let direction = match tail.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => {
                return Err(SortError::invalid_token(
                    raw,
                    "sort order, if set, must be :asc or :desc",
                ));
            }
        };
        return key_token(raw, head, direction);
    }
    match token.strip_prefix('-') {
        Some(name) => key_token(raw, name, SortDirection::Desc),
        None => key_token(raw, token, SortDirection::Asc),
    }
}

fn key_token(raw: &str, name: &str, direction: SortDirection) -> SortResult<Token> {
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(SortError::invalid_token(raw, "expected a property name"));
    }
    Ok(Token::Key(name.to_string(), direction))
}

/// Resolves `sort` tokens against an endpoint's sortable registry.
///
/// Each token is `name`, `-name`, `name:asc`, `name:desc`, `random` or
/// `random:<seed>`; a token may hold several comma-separated entries. An
/// empty token list selects the endpoint's default sort. `random` without a
/// seed draws a fresh one.
pub fn resolve<S: AsRef<str>>(tokens: &[S], registry: &SortRegistry) -> SortResult<SortSpec> {
    resolve_with_seed(tokens, registry, fresh_seed)
}

/// Same as `resolve`, drawing unseeded `random` seeds from `seed_source`
pub fn resolve_with_seed<S: AsRef<str>>(
    tokens: &[S],
    registry: &SortRegistry,
    seed_source: impl FnOnce() -> u64,
) -> SortResult<SortSpec> {
    let mut parsed = Vec::new();
    let requested: Vec<&str> = tokens
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| !t.trim().is_empty())
        .collect();
    let source: Vec<&str> = if requested.is_empty() {
        registry.default_sort().iter().map(String::as_str).collect()
    } else {
        requested
    };
    for token in source {
        for piece in token.split(',') {
            parsed.push(parse_token(piece)?);
        }
    }

    let has_random = parsed.iter().any(|t| matches!(t, Token::Random(_)));
    if has_random {
        if parsed.len() > 1 {
            return Err(SortError::IncompatibleRandomSort);
        }
        if let Some(Token::Random(seed)) = parsed.pop() {
            let seed = seed.unwrap_or_else(seed_source);
            return Ok(SortSpec::random(seed, registry.primary_key()));
        }
    }

    let mut keys: Vec<SortKey> = Vec::new();
    for token in parsed {
        if let Token::Key(name, direction) = token {
            let desc = registry
                .get(&name)
                .ok_or_else(|| SortError::UnknownSortKey {
                    key: name.clone(),
                    available: registry.names(),
                })?;
            // a repeated key cannot change an order already decided by its first use
            if keys.iter().any(|k| k.name == desc.name) {
                continue;
            }
            keys.push(SortKey::from_descriptor(desc, direction));
        }
    }
    Ok(SortSpec::by_keys(keys, registry.primary_key()))
}
