//! Refreshable view of one bot instance.
//!
//! `MonitorData` owns the API client, the localized clock, and one cache
//! slot per record family. Summary, properties and the sell log share the
//! general refresh cadence; the position scan and buy scan run on their own,
//! typically longer, cadences. Slots rebuild independently so a slow
//! position fan-out never delays a summary read.

use crate::config::MonitorConfig;
use crate::constants::{api_path, SALES_PAGE_SIZE};
use crate::error::Result;
use crate::models::{
    BuyLogEntry, DcaLogEntry, LedgerTransaction, Properties, SellLogEntry, Summary,
};
use crate::services::aggregates;
use crate::services::cache::CacheSlot;
use crate::services::fetcher::BotApiClient;
use crate::services::localtime::LocalClock;
use crate::services::normalize;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

pub struct MonitorData {
    config: MonitorConfig,
    client: BotApiClient,
    clock: LocalClock,
    summary: CacheSlot<Summary>,
    properties: CacheSlot<Properties>,
    sell_log: CacheSlot<Vec<SellLogEntry>>,
    dca_log: CacheSlot<Vec<DcaLogEntry>>,
    buy_log: CacheSlot<Vec<BuyLogEntry>>,
}

impl MonitorData {
    /// Build the monitor. Fails fast on an unusable base URL or offset
    /// string; nothing is fetched until the first accessor call.
    pub fn new(config: MonitorConfig) -> Result<Self> {
        let client = BotApiClient::new(&config.base_url, &config.api_token)?;
        let clock = LocalClock::parse(&config.timezone_offset)?;

        Ok(Self {
            summary: CacheSlot::new("summary", config.refresh_secs),
            properties: CacheSlot::new("properties", config.refresh_secs),
            sell_log: CacheSlot::new("sell_log", config.refresh_secs),
            dca_log: CacheSlot::new("dca_log", config.bag_refresh_secs),
            buy_log: CacheSlot::new("buy_log", config.buy_refresh_secs),
            config,
            client,
            clock,
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn clock(&self) -> &LocalClock {
        &self.clock
    }

    pub async fn summary(&self) -> Result<Arc<Summary>> {
        self.summary
            .get_with(|| async {
                let raw = self.client.fetch_object(api_path::MISC).await?;
                normalize::summary(&raw)
            })
            .await
    }

    pub async fn properties(&self) -> Result<Arc<Properties>> {
        self.properties
            .get_with(|| async {
                let raw = self.client.fetch_object(api_path::PROPERTIES).await?;
                normalize::properties(&raw)
            })
            .await
    }

    /// The full sell log, oldest sale first. Rebuilt by paging the sales
    /// endpoint until a page comes back empty or short.
    pub async fn sell_log(&self) -> Result<Arc<Vec<SellLogEntry>>> {
        self.sell_log
            .get_with(|| self.rebuild_sell_log())
            .await
    }

    async fn rebuild_sell_log(&self) -> Result<Vec<SellLogEntry>> {
        let log = paginate_sales(&self.clock, |page_index| {
            let path = format!(
                "{}?perPage={}&sort=SOLDDATE&sortDirection=ASCENDING&page={}",
                api_path::SALES,
                SALES_PAGE_SIZE,
                page_index
            );
            async move { self.client.fetch_object(&path).await }
        })
        .await?;

        info!(sales = log.len(), "Rebuilt sell log");
        Ok(log)
    }

    /// All open, pending, and watch-only positions merged into one list.
    /// The four upstream sources are fetched concurrently; no partial merge
    /// is ever published.
    pub async fn dca_log(&self) -> Result<Arc<Vec<DcaLogEntry>>> {
        self.dca_log.get_with(|| self.rebuild_dca_log()).await
    }

    async fn rebuild_dca_log(&self) -> Result<Vec<DcaLogEntry>> {
        // Fail-fast join: if any source fails, the whole rebuild fails and
        // the slot keeps its previous value.
        let (dca, pairs, pending, watch) = tokio::try_join!(
            self.client.fetch_array(api_path::DCA),
            self.client.fetch_array(api_path::PAIRS),
            self.client.fetch_array(api_path::PENDING),
            self.client.fetch_array(api_path::WATCHMODE),
        )?;

        info!(
            active = dca.len(),
            pairs = pairs.len(),
            pending = pending.len(),
            watch_only = watch.len(),
            "Rebuilt position scan"
        );
        merge_position_sources(&self.clock, &dca, &pairs, &pending, &watch)
    }

    /// The latest buy-candidate scan.
    pub async fn buy_log(&self) -> Result<Arc<Vec<BuyLogEntry>>> {
        self.buy_log
            .get_with(|| async {
                let rows = self.client.fetch_array(api_path::BUY_LOG).await?;
                let log = rows
                    .iter()
                    .map(normalize::buy_log_entry)
                    .collect::<Result<Vec<_>>>()?;
                info!(candidates = log.len(), "Rebuilt buy scan");
                Ok(log)
            })
            .await
    }

    // -- windowed sell-log views (localized day boundaries) ---------------

    pub async fn sell_log_today(&self) -> Result<Vec<SellLogEntry>> {
        let today = self.clock.now_local().date();
        self.sell_log_on(today).await
    }

    pub async fn sell_log_yesterday(&self) -> Result<Vec<SellLogEntry>> {
        let yesterday = self.clock.now_local().date() - Duration::days(1);
        self.sell_log_on(yesterday).await
    }

    async fn sell_log_on(&self, date: NaiveDate) -> Result<Vec<SellLogEntry>> {
        let log = self.sell_log().await?;
        Ok(log
            .iter()
            .filter(|s| s.sold_date.date() == date)
            .cloned()
            .collect())
    }

    pub async fn sell_log_last_7_days(&self) -> Result<Vec<SellLogEntry>> {
        self.sell_log_since(7).await
    }

    pub async fn sell_log_last_30_days(&self) -> Result<Vec<SellLogEntry>> {
        self.sell_log_since(30).await
    }

    async fn sell_log_since(&self, days: i64) -> Result<Vec<SellLogEntry>> {
        let cutoff = self.clock.now_local().date() - Duration::days(days);
        let log = self.sell_log().await?;
        Ok(log
            .iter()
            .filter(|s| s.sold_date.date() >= cutoff)
            .cloned()
            .collect())
    }

    // -- balance projections ----------------------------------------------

    pub async fn current_balance(&self) -> Result<f64> {
        Ok(self.summary().await?.balance)
    }

    pub async fn pairs_balance(&self) -> Result<f64> {
        Ok(self.summary().await?.pairs_value)
    }

    pub async fn dca_balance(&self) -> Result<f64> {
        Ok(self.summary().await?.dca_value)
    }

    pub async fn pending_balance(&self) -> Result<f64> {
        Ok(self.summary().await?.pending_value)
    }

    pub async fn dust_balance(&self) -> Result<f64> {
        Ok(self.summary().await?.dust_value)
    }

    /// Reconstructed account value at a past localized instant. Ledger
    /// transactions come in from the collaborator that stores them, in UTC,
    /// and are localized through the same clock as everything else.
    pub async fn snapshot_balance(
        &self,
        at: NaiveDateTime,
        transactions: &[LedgerTransaction],
    ) -> Result<f64> {
        let sells = self.sell_log().await?;
        let positions = self.dca_log().await?;
        let localized: Vec<(NaiveDateTime, f64)> = transactions
            .iter()
            .map(|t| (self.clock.project(t.timestamp.timestamp()), t.amount))
            .collect();

        Ok(aggregates::snapshot_balance(
            self.config.start_balance,
            at,
            &sells,
            &localized,
            &positions,
        ))
    }

    /// Current balance plus the leverage-adjusted value of every position.
    pub async fn total_current_value(&self) -> Result<f64> {
        let balance = self.current_balance().await?;
        let positions = self.dca_log().await?;
        Ok(aggregates::total_current_value(&positions, balance))
    }
}

/// Page through the sales endpoint, ascending by sold date, until a page
/// comes back empty or shorter than the page size. Pages are concatenated
/// before anything is published.
async fn paginate_sales<F, Fut>(clock: &LocalClock, fetch_page: F) -> Result<Vec<SellLogEntry>>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let mut log = Vec::new();
    let mut page_index = 1u32;

    loop {
        let page = fetch_page(page_index).await?;
        let entries = normalize::sell_log_page(&page, clock)?;
        let page_len = entries.len();
        log.extend(entries);

        debug!(page = page_index, rows = page_len, "Fetched sales page");
        if page_len < SALES_PAGE_SIZE {
            break;
        }
        page_index += 1;
    }

    Ok(log)
}

/// Merge the four position sources into one list. Only the active-DCA rows
/// carry buy-strategy detail.
fn merge_position_sources(
    clock: &LocalClock,
    dca: &[Value],
    pairs: &[Value],
    pending: &[Value],
    watch: &[Value],
) -> Result<Vec<DcaLogEntry>> {
    let mut log = Vec::with_capacity(dca.len() + pairs.len() + pending.len() + watch.len());
    for row in dca {
        log.push(normalize::dca_log_entry(row, true, clock)?);
    }
    for row in pairs.iter().chain(pending).chain(watch) {
        log.push(normalize::dca_log_entry(row, false, clock)?);
    }
    Ok(log)
}
