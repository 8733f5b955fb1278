use std::collections::HashMap;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::dtype::DType;

pub type Shape = Vec<i64>;
pub type Indices = Vec<i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Input,
    Hidden,
    Output,
    Network,
    Unknown,
}

/// Index of a symbol in the arena owned by a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a network scope inside a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub name: String,
    pub onnx_name: Option<String>,
    pub dtype: DType,
    /// Negative sizes are dimensions that are not statically known.
    pub shape: Shape,
    pub kind: SymbolKind,
    pub network_name: String,
}

impl SymbolInfo {
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkScope {
    pub name: String,
    /// Detached scopes belong to a duplicated network and are never searched.
    pub detached: bool,
    variable_lookup: HashMap<String, SymbolId>,
}

impl NetworkScope {
    fn new(name: &str, detached: bool) -> Self {
        NetworkScope {
            name: name.to_string(),
            detached,
            variable_lookup: HashMap::new(),
        }
    }

    pub fn get_variable(&self, variable_name: &str) -> Option<SymbolId> {
        self.variable_lookup.get(variable_name).copied()
    }
}

/// Every symbol declared by a query, plus per-network name scopes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    arena: Vec<SymbolInfo>,
    scopes: Vec<NetworkScope>,
    network_lookup: HashMap<String, NetworkId>,
    globals: HashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn get(&self, id: SymbolId) -> &SymbolInfo {
        &self.arena[id.0]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &SymbolInfo)> {
        self.arena
            .iter()
            .enumerate()
            .map(|(index, symbol)| (SymbolId(index), symbol))
    }

    pub fn scope(&self, network: NetworkId) -> &NetworkScope {
        &self.scopes[network.0]
    }

    pub fn network(&self, name: &str) -> Option<NetworkId> {
        self.network_lookup.get(name).copied()
    }

    /// Stores a symbol in the arena without binding its name anywhere.
    pub fn insert(&mut self, symbol: SymbolInfo) -> SymbolId {
        self.arena.push(symbol);
        SymbolId(self.arena.len() - 1)
    }

    /// Opens a scope for `name` and registers the query-wide network symbol.
    ///
    /// A repeated name still gets a scope, so its declarations can be
    /// checked, but the scope is detached and the error is returned.
    pub fn declare_network(
        &mut self,
        name: &str,
        position: Position,
    ) -> (NetworkId, Result<SymbolId, Error>) {
        let detached = self.network_lookup.contains_key(name);
        self.scopes.push(NetworkScope::new(name, detached));
        let network = NetworkId(self.scopes.len() - 1);

        if detached {
            return (
                network,
                Err(Error::new(
                    ErrorImpl::NetworkAlreadyDeclared {
                        network: name.to_string(),
                    },
                    position,
                )),
            );
        }

        let symbol = self.insert(SymbolInfo {
            name: name.to_string(),
            onnx_name: None,
            dtype: DType::Unknown,
            shape: vec![],
            kind: SymbolKind::Network,
            network_name: name.to_string(),
        });
        self.network_lookup.insert(name.to_string(), network);
        self.globals.insert(name.to_string(), symbol);
        tracing::trace!(network = name, "declared network");

        (network, Ok(symbol))
    }

    /// Binds an arena symbol under its name in `network`.
    pub fn declare_variable(
        &mut self,
        network: NetworkId,
        symbol: SymbolId,
        position: Position,
    ) -> Result<(), Error> {
        let name = self.arena[symbol.0].name.clone();
        let scope = &mut self.scopes[network.0];

        if scope.variable_lookup.contains_key(&name) {
            Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: name,
                    network: scope.name.clone(),
                },
                position,
            ))
        } else {
            tracing::trace!(network = %scope.name, variable = %name, "declared variable");
            scope.variable_lookup.insert(name, symbol);
            Ok(())
        }
    }

    /// Resolves an unqualified name.
    ///
    /// Every attached network scope is searched and the name must occur in
    /// exactly one of them. Network-level symbols are tried last.
    pub fn resolve(&self, variable: &str, position: Position) -> Result<SymbolId, Error> {
        let found: Vec<(&NetworkScope, SymbolId)> = self
            .scopes
            .iter()
            .filter(|scope| !scope.detached)
            .filter_map(|scope| scope.get_variable(variable).map(|symbol| (scope, symbol)))
            .collect();

        match found.as_slice() {
            [(_, symbol)] => return Ok(*symbol),
            [] => {}
            many => {
                return Err(Error::new(
                    ErrorImpl::AmbiguousVariable {
                        variable: variable.to_string(),
                        networks: many
                            .iter()
                            .map(|(scope, _)| format!("`{}`", scope.name))
                            .collect::<Vec<String>>()
                            .join(", "),
                    },
                    position,
                ))
            }
        }

        self.globals.get(variable).copied().ok_or_else(|| {
            Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: variable.to_string(),
                },
                position,
            )
        })
    }
}
