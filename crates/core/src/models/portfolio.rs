use super::holding::Holding;

/// The main data container: every holding the user owns, in the order
/// they were added. Symbols are unique and uppercased.
///
/// This is what gets written to the portfolio file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, symbol: &str) -> bool {
        self.position(symbol).is_some()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, symbol: &str) -> Option<&Holding> {
        self.position(symbol).map(|idx| &self.holdings[idx])
    }

    pub(crate) fn get_mut(&mut self, symbol: &str) -> Option<&mut Holding> {
        self.position(symbol).map(move |idx| &mut self.holdings[idx])
    }

    /// Append a holding. Returns it back if its symbol is already present.
    pub fn insert(&mut self, holding: Holding) -> Result<(), Holding> {
        if self.contains(&holding.symbol) {
            return Err(holding);
        }
        self.holdings.push(holding);
        Ok(())
    }

    /// Remove and return the holding for `symbol`, preserving the order of the rest.
    pub fn remove(&mut self, symbol: &str) -> Option<Holding> {
        self.position(symbol).map(|idx| self.holdings.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Holding> {
        self.holdings.iter_mut()
    }

    /// Symbols in insertion order.
    pub fn symbols(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.symbol.clone()).collect()
    }

    fn position(&self, symbol: &str) -> Option<usize> {
        let upper = symbol.trim().to_uppercase();
        self.holdings.iter().position(|h| h.symbol == upper)
    }
}
