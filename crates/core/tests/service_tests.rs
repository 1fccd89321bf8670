// ═══════════════════════════════════════════════════════════════════
// Service Tests: QuoteService, PortfolioService
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use stock_tracker_core::errors::CoreError;
use stock_tracker_core::models::company_info::CompanyInfo;
use stock_tracker_core::models::holding::Holding;
use stock_tracker_core::models::portfolio::Portfolio;
use stock_tracker_core::providers::registry::QuoteProviderRegistry;
use stock_tracker_core::providers::traits::QuoteProvider;
use stock_tracker_core::services::portfolio_service::PortfolioService;
use stock_tracker_core::services::quote_service::QuoteService;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn holding(symbol: &str, shares: u64, price: f64) -> Holding {
    Holding::new(symbol, shares, price, d(2024, 1, 15)).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Mock Provider
// ═══════════════════════════════════════════════════════════════════

/// In-memory market. Clones share state, so a test can change prices
/// after handing a provider to a service.
#[derive(Clone, Default)]
struct MockMarket {
    name: String,
    prices: Arc<Mutex<HashMap<String, f64>>>,
    infos: Arc<Mutex<HashMap<String, CompanyInfo>>>,
    price_calls: Arc<AtomicUsize>,
}

impl MockMarket {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn set_price(&self, symbol: &str, price: f64) {
        self.prices.lock().unwrap().insert(symbol.to_string(), price);
    }

    fn set_info(&self, symbol: &str, info: CompanyInfo) {
        self.infos.lock().unwrap().insert(symbol.to_string(), info);
    }

    fn go_offline(&self) {
        self.prices.lock().unwrap().clear();
        self.infos.lock().unwrap().clear();
    }

    fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for MockMarket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.prices
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
            })
    }

    async fn get_company_info(&self, symbol: &str) -> Result<CompanyInfo, CoreError> {
        self.infos
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| CoreError::Api {
                provider: self.name.clone(),
                message: format!("no info for {symbol}"),
            })
    }
}

fn service_with(markets: &[&MockMarket]) -> QuoteService {
    let mut registry = QuoteProviderRegistry::new();
    for market in markets {
        registry.register(Box::new((*market).clone()));
    }
    QuoteService::new(registry)
}

fn apple_info() -> CompanyInfo {
    CompanyInfo {
        name: Some("Apple Inc.".into()),
        sector: Some("Technology".into()),
        ..CompanyInfo::default()
    }
}

// ═══════════════════════════════════════════════════════════════════
// QuoteService: fetch_quote
// ═══════════════════════════════════════════════════════════════════

mod fetch_quote {
    use super::*;

    #[tokio::test]
    async fn returns_price_and_info() {
        let market = MockMarket::new("Mock");
        market.set_price("AAPL", 180.0);
        market.set_info("AAPL", apple_info());
        let service = service_with(&[&market]);

        let quote = service.fetch_quote("aapl").await.unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, 180.0);
        assert_eq!(quote.info, Some(apple_info()));
    }

    #[tokio::test]
    async fn missing_info_does_not_fail() {
        let market = MockMarket::new("Mock");
        market.set_price("AAPL", 180.0);
        let service = service_with(&[&market]);

        let quote = service.fetch_quote("AAPL").await.unwrap();
        assert_eq!(quote.price, 180.0);
        assert!(quote.info.is_none());
    }

    #[tokio::test]
    async fn unknown_symbol_is_fetch_error() {
        let market = MockMarket::new("Mock");
        let service = service_with(&[&market]);

        let err = service.fetch_quote("ZZZZ").await.unwrap_err();
        assert!(err.is_fetch_error());
        assert_eq!(market.price_calls(), 1);
    }

    #[tokio::test]
    async fn empty_registry_is_no_provider() {
        let service = service_with(&[]);
        let err = service.fetch_quote("AAPL").await.unwrap_err();
        assert!(matches!(err, CoreError::NoProvider(_)));
    }

    #[tokio::test]
    async fn invalid_symbol_never_reaches_provider() {
        let market = MockMarket::new("Mock");
        let service = service_with(&[&market]);
        let err = service.fetch_quote("  ").await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert_eq!(market.price_calls(), 0);
    }

    #[tokio::test]
    async fn falls_back_to_next_provider() {
        let primary = MockMarket::new("Primary");
        let backup = MockMarket::new("Backup");
        backup.set_price("AAPL", 181.0);
        let service = service_with(&[&primary, &backup]);

        let quote = service.fetch_quote("AAPL").await.unwrap();
        assert_eq!(quote.price, 181.0);
        assert_eq!(primary.price_calls(), 1);
        assert_eq!(backup.price_calls(), 1);
    }

    #[tokio::test]
    async fn first_success_stops_the_chain() {
        let primary = MockMarket::new("Primary");
        let backup = MockMarket::new("Backup");
        primary.set_price("AAPL", 180.0);
        backup.set_price("AAPL", 999.0);
        let service = service_with(&[&primary, &backup]);

        assert_eq!(service.fetch_quote("AAPL").await.unwrap().price, 180.0);
        assert_eq!(backup.price_calls(), 0);
    }

    #[tokio::test]
    async fn single_attempt_per_provider() {
        let market = MockMarket::new("Mock");
        let service = service_with(&[&market]);
        let _ = service.fetch_quote("AAPL").await;
        assert_eq!(market.price_calls(), 1);
    }

    #[tokio::test]
    async fn rejects_non_positive_price() {
        let market = MockMarket::new("Mock");
        market.set_price("AAPL", 0.0);
        let service = service_with(&[&market]);
        let err = service.fetch_quote("AAPL").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { ref message, .. } if message.contains("Invalid price")));
    }

    #[tokio::test]
    async fn rejects_nan_price_then_uses_backup() {
        let primary = MockMarket::new("Primary");
        let backup = MockMarket::new("Backup");
        primary.set_price("AAPL", f64::NAN);
        backup.set_price("AAPL", 180.0);
        let service = service_with(&[&primary, &backup]);
        assert_eq!(service.fetch_quote("AAPL").await.unwrap().price, 180.0);
    }

    #[tokio::test]
    async fn info_comes_from_any_provider() {
        let primary = MockMarket::new("Primary");
        let backup = MockMarket::new("Backup");
        primary.set_price("AAPL", 180.0);
        backup.set_info("AAPL", apple_info());
        let service = service_with(&[&primary, &backup]);

        let quote = service.fetch_quote("AAPL").await.unwrap();
        assert_eq!(quote.info, Some(apple_info()));
    }

    #[tokio::test]
    async fn empty_info_is_treated_as_missing() {
        let market = MockMarket::new("Mock");
        market.set_price("AAPL", 180.0);
        market.set_info("AAPL", CompanyInfo::default());
        let service = service_with(&[&market]);
        assert!(service.fetch_quote("AAPL").await.unwrap().info.is_none());
    }

    #[test]
    fn provider_names_in_order() {
        let a = MockMarket::new("A");
        let b = MockMarket::new("B");
        assert_eq!(service_with(&[&a, &b]).provider_names(), vec!["A", "B"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// QuoteService: refresh
// ═══════════════════════════════════════════════════════════════════

mod refresh {
    use super::*;

    #[tokio::test]
    async fn refresh_updates_price_and_info() {
        let market = MockMarket::new("Mock");
        market.set_price("AAPL", 180.0);
        market.set_info("AAPL", apple_info());
        let service = service_with(&[&market]);

        let mut h = holding("AAPL", 10, 150.0);
        assert!(service.refresh_holding(&mut h).await.unwrap());
        assert_eq!(h.current_price, 180.0);
        assert_eq!(h.company_info, apple_info());
    }

    #[tokio::test]
    async fn failed_refresh_leaves_holding_untouched() {
        let market = MockMarket::new("Mock");
        market.set_price("AAPL", 180.0);
        market.set_info("AAPL", apple_info());
        let service = service_with(&[&market]);

        let mut h = holding("AAPL", 10, 150.0);
        service.refresh_holding(&mut h).await.unwrap();
        let before = h.clone();

        market.go_offline();
        assert!(service.refresh_holding(&mut h).await.is_err());
        assert_eq!(h, before);
        assert_eq!(h.current_price.to_bits(), before.current_price.to_bits());
    }

    #[tokio::test]
    async fn refresh_portfolio_counts_changes() {
        let market = MockMarket::new("Mock");
        market.set_price("AAPL", 180.0);
        market.set_price("MSFT", 400.0);
        let service = service_with(&[&market]);

        let mut p = Portfolio::new();
        p.insert(holding("AAPL", 10, 150.0)).unwrap();
        p.insert(holding("MSFT", 2, 300.0)).unwrap();
        p.insert(holding("ZZZZ", 1, 1.0)).unwrap();

        assert_eq!(service.refresh_portfolio(&mut p).await, 2);
        assert_eq!(p.get("AAPL").unwrap().current_price, 180.0);
        assert_eq!(p.get("MSFT").unwrap().current_price, 400.0);
        assert_eq!(p.get("ZZZZ").unwrap().current_price, 0.0);
        assert_eq!(market.price_calls(), 3);

        // Same prices again: nothing changes.
        assert_eq!(service.refresh_portfolio(&mut p).await, 0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioService
// ═══════════════════════════════════════════════════════════════════

mod portfolio_service {
    use super::*;

    #[test]
    fn add_holding_inserts() {
        let service = PortfolioService::new();
        let mut p = Portfolio::new();
        service.add_holding(&mut p, holding("AAPL", 10, 150.0)).unwrap();
        assert!(p.contains("AAPL"));
    }

    #[test]
    fn add_duplicate_is_rejected() {
        let service = PortfolioService::new();
        let mut p = Portfolio::new();
        service.add_holding(&mut p, holding("AAPL", 10, 150.0)).unwrap();
        let err = service
            .add_holding(&mut p, holding("aapl", 1, 1.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateHolding(ref s) if s == "AAPL"));
        assert_eq!(p.get("AAPL").unwrap().shares, 10);
    }

    #[test]
    fn ensure_absent() {
        let service = PortfolioService::default();
        let mut p = Portfolio::new();
        assert!(service.ensure_absent(&p, "aapl").is_ok());
        p.insert(holding("AAPL", 1, 1.0)).unwrap();
        let err = service.ensure_absent(&p, " aapl ").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateHolding(ref s) if s == "AAPL"));
    }

    #[test]
    fn remove_holding() {
        let service = PortfolioService::new();
        let mut p = Portfolio::new();
        p.insert(holding("AAPL", 1, 1.0)).unwrap();
        let removed = service.remove_holding(&mut p, "aapl").unwrap();
        assert_eq!(removed.symbol, "AAPL");
        assert!(p.is_empty());
    }

    #[test]
    fn remove_missing_holding() {
        let service = PortfolioService::new();
        let mut p = Portfolio::new();
        let err = service.remove_holding(&mut p, "msft").unwrap_err();
        assert!(matches!(err, CoreError::HoldingNotFound(ref s) if s == "MSFT"));
    }

    #[test]
    fn update_holding_changes_position_only() {
        let service = PortfolioService::new();
        let mut p = Portfolio::new();
        let mut h = holding("AAPL", 10, 150.0);
        h.current_price = 180.0;
        p.insert(h).unwrap();

        service.update_holding(&mut p, "aapl", 12, 155.5).unwrap();
        let h = p.get("AAPL").unwrap();
        assert_eq!(h.shares, 12);
        assert_eq!(h.purchase_price, 155.5);
        assert_eq!(h.purchase_date, d(2024, 1, 15));
        assert_eq!(h.current_price, 180.0);
    }

    #[test]
    fn update_validates_before_lookup() {
        let service = PortfolioService::new();
        let mut p = Portfolio::new();
        p.insert(holding("AAPL", 10, 150.0)).unwrap();
        let err = service.update_holding(&mut p, "AAPL", 0, 1.0).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        let err = service.update_holding(&mut p, "AAPL", 1, 0.0).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert_eq!(p.get("AAPL").unwrap().shares, 10);
    }

    #[test]
    fn update_missing_holding() {
        let service = PortfolioService::new();
        let mut p = Portfolio::new();
        let err = service.update_holding(&mut p, "AAPL", 1, 1.0).unwrap_err();
        assert!(matches!(err, CoreError::HoldingNotFound(_)));
    }

    // ── build_report ──────────────────────────────────────────────

    #[test]
    fn empty_report() {
        let report = PortfolioService::new().build_report(&Portfolio::new());
        assert!(report.is_empty());
        assert_eq!(report.total_cost, 0.0);
        assert_eq!(report.total_value, 0.0);
        assert_eq!(report.total_change_pct, 0.0);
    }

    #[test]
    fn report_rows_and_totals() {
        let mut p = Portfolio::new();
        let mut aapl = holding("AAPL", 10, 150.0);
        aapl.current_price = 180.0;
        let mut msft = holding("MSFT", 2, 400.0);
        msft.current_price = 350.0;
        p.insert(aapl).unwrap();
        p.insert(msft).unwrap();

        let report = PortfolioService::new().build_report(&p);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].symbol, "AAPL");
        assert_eq!(report.rows[0].cost, 1500.0);
        assert_eq!(report.rows[0].value, 1800.0);
        assert_eq!(report.rows[0].profit_loss, 300.0);
        assert_eq!(report.rows[1].symbol, "MSFT");
        assert_eq!(report.rows[1].profit_loss, -100.0);

        assert_eq!(report.total_cost, 2300.0);
        assert_eq!(report.total_value, 2500.0);
        assert_eq!(report.total_profit_loss, 200.0);
        assert!((report.total_change_pct - 200.0 / 2300.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn report_profit_loss_is_exact_difference() {
        let mut p = Portfolio::new();
        for (sym, shares, buy, now) in [
            ("AAPL", 10, 150.13, 180.77),
            ("NVDA", 7, 432.17, 118.93),
            ("KO", 33, 58.01, 61.4),
        ] {
            let mut h = holding(sym, shares, buy);
            h.current_price = now;
            p.insert(h).unwrap();
        }
        for row in PortfolioService::new().build_report(&p).rows {
            let expected = row.shares as f64 * row.current_price - row.shares as f64 * row.purchase_price;
            assert_eq!(row.profit_loss, expected);
        }
    }

    #[test]
    fn unpriced_rows_are_flagged() {
        let mut p = Portfolio::new();
        p.insert(holding("AAPL", 1, 1.0)).unwrap();
        let report = PortfolioService::new().build_report(&p);
        assert!(!report.rows[0].priced);
    }
}
