use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use super::endpoints::Endpoint;
use super::normalize::{self, DEFAULT_NET_VALUE};
use super::observer::{RequestObserver, TracingObserver};
use super::types::{
    PortfolioSnapshot, RankingEntry, RawCurrentRebalancing, RawRebalancingHistory, RebalancingRecord,
};
use crate::error::FetchError;
use crate::session::Session;

/// Client for the portfolio ("cube") endpoints. Every call is a single
/// blocking attempt; failures are returned, never retried.
pub struct XueqiuClient {
    session: Session,
    observer: Box<dyn RequestObserver>,
}

impl XueqiuClient {
    pub fn new(session: Session) -> Self {
        Self::with_observer(session, Box::new(TracingObserver))
    }

    pub fn with_observer(session: Session, observer: Box<dyn RequestObserver>) -> Self {
        Self { session, observer }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn ensure_authenticated(&self) -> Result<(), FetchError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(FetchError::NotAuthenticated)
        }
    }

    /// Sends the request and returns status and body, whatever the status.
    fn send(&self, endpoint: Endpoint, query: &[(&str, String)]) -> Result<(u16, String), FetchError> {
        self.observer.request_started(endpoint, query);
        let response = self.session.get(endpoint.path(), query)?;
        let status = response.status().as_u16();
        self.observer.response_received(endpoint, status);
        let body = response.text()?;
        Ok((status, body))
    }

    fn try_fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let (status, body) = self.send(endpoint, query)?;
        if let Some(err) = FetchError::from_status(status) {
            return Err(err);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// GET a primary data endpoint: 400/403/404 and other non-2xx statuses
    /// map to their errors, then the body is decoded as `T`.
    fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        self.try_fetch_json(endpoint, query)
            .inspect_err(|e| self.observer.request_failed(endpoint, e))
    }

    /// Net value from the quote endpoint. A 400 or an undecodable body falls
    /// back to 1.0; other error statuses fail the whole holdings call.
    fn fetch_net_value(&self, portfolio_code: &str) -> Result<f64, FetchError> {
        let endpoint = Endpoint::Quote;
        let query = [("code", portfolio_code.to_string())];
        let (status, body) = self
            .send(endpoint, &query)
            .inspect_err(|e| self.observer.request_failed(endpoint, e))?;

        if status == 400 {
            self.observer.request_tolerated(endpoint, "quote rejected with HTTP 400");
            return Ok(DEFAULT_NET_VALUE);
        }
        if !(200..300).contains(&status) {
            let err = FetchError::Http(status);
            self.observer.request_failed(endpoint, &err);
            return Err(err);
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(quote) => Ok(normalize::net_value(&quote, portfolio_code)),
            Err(e) => {
                self.observer.request_tolerated(endpoint, &e.to_string());
                Ok(DEFAULT_NET_VALUE)
            }
        }
    }

    /// Current holdings of a portfolio, e.g. `ZH123456`.
    #[instrument(skip(self))]
    pub fn fetch_holdings(&self, portfolio_code: &str) -> Result<PortfolioSnapshot, FetchError> {
        self.ensure_authenticated()?;

        let current: RawCurrentRebalancing = self.fetch_json(
            Endpoint::CurrentRebalancing,
            &[("cube_symbol", portfolio_code.to_string())],
        )?;
        let net_value = self.fetch_net_value(portfolio_code)?;

        let snapshot = normalize::portfolio_snapshot(portfolio_code, current, net_value, normalize::now_timestamp());
        self.observer.records_normalized(Endpoint::CurrentRebalancing, snapshot.holding_count);
        Ok(snapshot)
    }

    /// Rebalancing events flattened to one record per touched stock, newest
    /// first as served.
    #[instrument(skip(self))]
    pub fn fetch_rebalancing_history(
        &self,
        portfolio_code: &str,
        count: u32,
    ) -> Result<Vec<RebalancingRecord>, FetchError> {
        self.ensure_authenticated()?;

        let history: RawRebalancingHistory = self.fetch_json(
            Endpoint::RebalancingHistory,
            &[
                ("cube_symbol", portfolio_code.to_string()),
                ("count", count.to_string()),
                ("page", "1".to_string()),
            ],
        )?;

        let records = normalize::rebalancing_records(history);
        self.observer.records_normalized(Endpoint::RebalancingHistory, records.len());
        Ok(records)
    }

    /// Leaderboard for a category code (see [`RankingCategory`](super::RankingCategory)).
    /// Ranks follow the response order.
    #[instrument(skip(self))]
    pub fn fetch_ranking(&self, category: u32, count: u32) -> Result<Vec<RankingEntry>, FetchError> {
        self.ensure_authenticated()?;

        let endpoint = Endpoint::Ranking;
        let payload: Value = self.fetch_json(
            endpoint,
            &[("category", category.to_string()), ("count", count.to_string())],
        )?;

        let entries = normalize::ranking_entries(&payload)
            .inspect_err(|e| self.observer.request_failed(endpoint, e))?;
        self.observer.records_normalized(endpoint, entries.len());
        Ok(entries)
    }
}
