//! The update orchestrator.
//!
//! One [`TradingBot`] binds a strategy instance to an instrument, a data
//! feed, and a venue, and drives the per-cycle sequence in both continuous
//! (timestamp-driven) and periodic (index-driven) operation.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use tradebot_config::{EmailSettings, RunConfig, StrategySettings};
use tradebot_core::error::{BotError, DataError};
use tradebot_core::traits::{DataFeed, Notifier, SignalGenerator, Venue};
use tradebot_core::types::{
    Bar, Granularity, Order, QualifiedOrder, ScanDetails, ScanHit,
};

use crate::dedup::DuplicateDetector;
use crate::normalize::{normalize_orders, OrderStamp};
use crate::qualify::qualify_orders;
use crate::refresh::{AuxSource, DataDescriptor, DataRefresher, RefreshedData};
use crate::summary::{build_backtest_summary, BacktestSummary};
use crate::window::{visible_window, window_bundle};

/// One strategy bound to one instrument, with everything it needs to run.
pub struct TradingBot {
    instrument: String,
    strategy: Box<dyn SignalGenerator>,
    feed: Arc<dyn DataFeed>,
    venue: Arc<dyn Venue>,
    notifier: Option<Arc<dyn Notifier>>,
    refresher: DataRefresher,
    run: RunConfig,
    email: EmailSettings,
    stamp: OrderStamp,
    period: usize,
    include_positions: bool,
    detector: DuplicateDetector,
    data: RefreshedData,
    scan_results: HashMap<String, ScanHit>,
}

fn data_descriptor(settings: &StrategySettings) -> DataDescriptor {
    let files: Vec<_> = settings
        .granularities
        .iter()
        .filter_map(|g| settings.data_files.get(g).map(|p| (*g, p.clone())))
        .collect();
    match files.len() {
        0 => DataDescriptor::Fetch,
        1 => DataDescriptor::LocalSingle(files[0].1.clone()),
        _ => DataDescriptor::LocalMulti(files),
    }
}

impl TradingBot {
    /// Build a bot and perform its initial data refresh.
    ///
    /// Fails when the configured data source yields no usable bars.
    #[allow(clippy::too_many_arguments)]
    pub async fn new(
        strategy: Box<dyn SignalGenerator>,
        settings: StrategySettings,
        run: RunConfig,
        email: EmailSettings,
        aux: Option<HashMap<String, AuxSource>>,
        feed: Arc<dyn DataFeed>,
        venue: Arc<dyn Venue>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Result<Self, BotError> {
        let refresher = DataRefresher::new(
            Arc::clone(&feed),
            settings.instrument.clone(),
            settings.granularities.clone(),
            settings.period,
            data_descriptor(&settings),
            settings.quote_file.clone(),
            aux,
            run.data_start,
            run.data_end,
        );
        let data = refresher.refresh().await?;

        let stamp = OrderStamp {
            instrument: settings.instrument.clone(),
            strategy: strategy.name().to_string(),
            granularity: refresher.base_granularity(),
            sizing: settings.sizing,
            risk_pc: settings
                .risk_pc
                .and_then(|pc| Decimal::try_from(pc).ok()),
        };

        info!(
            instrument = %settings.instrument,
            strategy = %stamp.strategy,
            granularity = %stamp.granularity,
            bars = data.data.len(),
            "Bot initialised"
        );

        Ok(Self {
            instrument: settings.instrument,
            strategy,
            feed,
            venue,
            notifier,
            refresher,
            run,
            email,
            stamp,
            period: settings.period,
            include_positions: settings.include_positions,
            detector: DuplicateDetector::new(),
            data,
            scan_results: HashMap::new(),
        })
    }

    /// The bot's base granularity.
    pub fn granularity(&self) -> Granularity {
        self.stamp.granularity
    }

    /// Scan hits accumulated so far, keyed by instrument.
    pub fn scan_results(&self) -> &HashMap<String, ScanHit> {
        &self.scan_results
    }

    /// The currently held datasets.
    pub fn data(&self) -> &RefreshedData {
        &self.data
    }

    /// Valid periodic iteration bounds: `(first, end)` row indices into the
    /// pre-fetched data, where `first` is the earliest row with a full
    /// lookback behind it.
    pub fn iteration_range(&self) -> Result<(usize, usize), DataError> {
        let available = self.data.data.len();
        if available < self.period {
            return Err(DataError::InsufficientHistory {
                required: self.period,
                available,
            });
        }
        Ok((self.period, available))
    }

    /// Run one continuous cycle at `timestamp` (epoch milliseconds).
    ///
    /// Live bots refresh their data first; backtest bots re-window the held
    /// datasets. A cycle with insufficient visible history, or one whose
    /// current bar repeats the previous cycle's, ends without invoking the
    /// strategy.
    pub async fn update_continuous(&mut self, timestamp: i64) -> Result<(), BotError> {
        if !self.run.backtest_mode {
            self.data = self.refresher.refresh().await?;
        }

        let windowed = window_bundle(
            &self.data.bundle,
            timestamp,
            self.run.indexing,
            self.period,
        );
        if !windowed.sufficient {
            debug!(
                instrument = %self.instrument,
                timestamp,
                required = self.period,
                "Insufficient visible data; awaiting more bars"
            );
            return Ok(());
        }
        let Some(current_bar) = windowed.current_bar else {
            return Ok(());
        };

        if self.detector.check(Some(&current_bar)) {
            debug!(
                instrument = %self.instrument,
                timestamp = current_bar.timestamp,
                "Current bar already processed; skipping cycle"
            );
            return Ok(());
        }

        if self.run.backtest_mode {
            self.venue
                .update_simulated_position(&current_bar, &self.instrument)
                .await?;
        }

        let intent = self.strategy.signal(&windowed.data);
        if self.run.verbosity >= 1 {
            info!(
                instrument = %self.instrument,
                timestamp = current_bar.timestamp,
                orders = intent.len(),
                "Cycle complete"
            );
        }
        if intent.is_empty() {
            return Ok(());
        }

        let orders = normalize_orders(intent, &self.stamp)?;
        let quote_bar = self.quote_bar_at(timestamp).unwrap_or(current_bar);
        let qualified = self
            .qualify(orders, &current_bar, &quote_bar)
            .await?;

        if self.run.scan_mode {
            self.record_scan_hits(&qualified)?;
        } else {
            self.submit(qualified, &current_bar).await?;
        }
        Ok(())
    }

    /// Run one periodic cycle against row `index` of the pre-fetched data.
    ///
    /// Indices advance monotonically in this mode, so duplicate suppression
    /// does not apply.
    pub async fn update_periodic(&mut self, index: usize) -> Result<(), BotError> {
        let current_bar = *self
            .data
            .data
            .get(index)
            .ok_or(DataError::NoDataAvailable)?;
        let quote_bar = self.data.quote.get(index).copied().unwrap_or(current_bar);

        if self.run.backtest_mode {
            self.venue
                .update_simulated_position(&current_bar, &self.instrument)
                .await?;
        }

        let positions = if self.include_positions {
            Some(self.venue.positions(&self.instrument).await?)
        } else {
            None
        };

        let intent = self.strategy.signal_at(index, positions.as_deref());
        if intent.is_empty() {
            return Ok(());
        }

        let orders = normalize_orders(intent, &self.stamp)?;
        let qualified = self
            .qualify(orders, &current_bar, &quote_bar)
            .await?;

        if self.run.scan_mode {
            self.record_scan_hits(&qualified)?;
        } else {
            self.submit(qualified, &current_bar).await?;
        }
        Ok(())
    }

    /// Assemble the backtest summary from the accumulated account series and
    /// the venue's history.
    pub fn create_backtest_summary(
        &self,
        balance: Vec<Decimal>,
        nav: Vec<Decimal>,
        margin: Vec<Decimal>,
        timestamps: Option<Vec<i64>>,
    ) -> BacktestSummary {
        build_backtest_summary(
            &self.data.data,
            balance,
            nav,
            margin,
            timestamps,
            self.venue.as_ref(),
            self.strategy.indicators(),
            &self.instrument,
            self.stamp.granularity,
        )
    }

    fn quote_bar_at(&self, cutoff: i64) -> Option<Bar> {
        visible_window(&self.data.quote, cutoff, self.run.indexing, Some(1))
            .last()
            .copied()
    }

    async fn qualify(
        &self,
        orders: Vec<Order>,
        current_bar: &Bar,
        quote_bar: &Bar,
    ) -> Result<Vec<QualifiedOrder>, BotError> {
        let use_live = self.run.use_live_price && self.feed.has_live_price();
        qualify_orders(orders, self.feed.as_ref(), use_live, current_bar, quote_bar).await
    }

    async fn submit(
        &self,
        qualified: Vec<QualifiedOrder>,
        current_bar: &Bar,
    ) -> Result<(), BotError> {
        for order in qualified {
            if self.run.verbosity >= 2 {
                info!(
                    instrument = %order.order.instrument,
                    kind = %order.order.kind,
                    price = %order.price,
                    "Submitting order"
                );
            }

            if self.run.notify >= 1 && !self.run.backtest_mode {
                if let Some(notifier) = &self.notifier {
                    notifier.record_order(&order, &self.run.order_summary)?;
                    if self.run.notify >= 2 {
                        if let Some(sender) = &self.email.sender {
                            notifier.send_order_email(
                                &order,
                                &self.email.recipients,
                                sender,
                            )?;
                        }
                    }
                }
            }

            self.venue
                .place_order(order, current_bar.datetime())
                .await?;
        }
        Ok(())
    }

    fn record_scan_hits(&mut self, qualified: &[QualifiedOrder]) -> Result<(), BotError> {
        for order in qualified {
            let hit = ScanHit {
                size: order.order.size,
                entry: order.price,
                stop: order.order.stop_loss,
                take: order.order.take_profit,
                signal: order.order.direction,
            };
            if self.run.verbosity >= 1 {
                info!(
                    instrument = %order.order.instrument,
                    entry = %hit.entry,
                    signal = ?hit.signal,
                    "Scan hit"
                );
            }
            self.scan_results.insert(order.order.instrument.clone(), hit);
        }

        if self.run.notify >= 1 {
            if let Some(notifier) = &self.notifier {
                let details = ScanDetails {
                    index: self.instrument.clone(),
                    strategy: self.stamp.strategy.clone(),
                    granularity: self.stamp.granularity,
                };
                if let Some(sender) = &self.email.sender {
                    notifier.send_scan_report(
                        &self.scan_results,
                        &details,
                        &self.email.recipients,
                        sender,
                    )?;
                } else {
                    warn!("Scan notifications requested but no sender configured");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tradebot_core::error::VenueError;
    use tradebot_core::types::{
        BarSeries, DataBundle, Direction, OrderDraft, OrderIntent, OrderRecord, Position,
        TradeRecord,
    };

    struct CountingStrategy {
        signals: Arc<AtomicUsize>,
        intent: fn() -> OrderIntent,
    }

    impl SignalGenerator for CountingStrategy {
        fn name(&self) -> &str {
            "counting"
        }

        fn signal(&mut self, _data: &DataBundle) -> OrderIntent {
            self.signals.fetch_add(1, Ordering::SeqCst);
            (self.intent)()
        }

        fn signal_at(&mut self, _index: usize, _position: Option<&[Position]>) -> OrderIntent {
            self.signals.fetch_add(1, Ordering::SeqCst);
            (self.intent)()
        }
    }

    #[derive(Default)]
    struct RecordingVenue {
        placed: Mutex<Vec<QualifiedOrder>>,
    }

    #[async_trait]
    impl Venue for RecordingVenue {
        async fn positions(&self, _instrument: &str) -> Result<Vec<Position>, VenueError> {
            Ok(vec![])
        }

        async fn place_order(
            &self,
            order: QualifiedOrder,
            _order_time: DateTime<Utc>,
        ) -> Result<(), VenueError> {
            self.placed.lock().unwrap().push(order);
            Ok(())
        }

        async fn update_simulated_position(
            &self,
            _bar: &Bar,
            _instrument: &str,
        ) -> Result<(), VenueError> {
            Ok(())
        }

        fn trades(&self) -> Vec<TradeRecord> {
            vec![]
        }

        fn orders(&self) -> Vec<OrderRecord> {
            vec![]
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        records: AtomicUsize,
        scans: AtomicUsize,
    }

    impl Notifier for CountingNotifier {
        fn record_order(
            &self,
            _order: &QualifiedOrder,
            _destination: &Path,
        ) -> Result<(), BotError> {
            self.records.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn send_order_email(
            &self,
            _order: &QualifiedOrder,
            _recipients: &[String],
            _sender: &str,
        ) -> Result<(), BotError> {
            Ok(())
        }

        fn send_scan_report(
            &self,
            _results: &HashMap<String, ScanHit>,
            _details: &ScanDetails,
            _recipients: &[String],
            _sender: &str,
        ) -> Result<(), BotError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct PositionAwareStrategy {
        observed: Arc<Mutex<Vec<bool>>>,
    }

    impl SignalGenerator for PositionAwareStrategy {
        fn name(&self) -> &str {
            "position-aware"
        }

        fn signal(&mut self, _data: &DataBundle) -> OrderIntent {
            OrderIntent::none()
        }

        fn signal_at(&mut self, _index: usize, position: Option<&[Position]>) -> OrderIntent {
            self.observed.lock().unwrap().push(position.is_some());
            OrderIntent::none()
        }
    }

    #[derive(Default)]
    struct PositionCountingVenue {
        position_calls: AtomicUsize,
    }

    #[async_trait]
    impl Venue for PositionCountingVenue {
        async fn positions(&self, instrument: &str) -> Result<Vec<Position>, VenueError> {
            self.position_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Position::new(instrument, Decimal::ONE, Decimal::ONE)])
        }

        async fn place_order(
            &self,
            _order: QualifiedOrder,
            _order_time: DateTime<Utc>,
        ) -> Result<(), VenueError> {
            Ok(())
        }

        async fn update_simulated_position(
            &self,
            _bar: &Bar,
            _instrument: &str,
        ) -> Result<(), VenueError> {
            Ok(())
        }

        fn trades(&self) -> Vec<TradeRecord> {
            vec![]
        }

        fn orders(&self) -> Vec<OrderRecord> {
            vec![]
        }

        fn name(&self) -> &str {
            "position-counting"
        }
    }

    struct FixedFeed {
        bars: Vec<Bar>,
    }

    #[async_trait]
    impl DataFeed for FixedFeed {
        async fn load_local(
            &self,
            _path: &Path,
            _start: Option<i64>,
            _end: Option<i64>,
        ) -> Result<BarSeries, DataError> {
            Err(DataError::NoDataAvailable)
        }

        async fn fetch(
            &self,
            instrument: &str,
            granularity: Granularity,
            _count: usize,
            _start: Option<i64>,
            _end: Option<i64>,
        ) -> Result<BarSeries, DataError> {
            Ok(BarSeries::from_bars(
                instrument,
                granularity,
                self.bars.clone(),
            ))
        }

        async fn fetch_quote(
            &self,
            base: &BarSeries,
            _instrument: &str,
            _granularity: Granularity,
            _start: Option<i64>,
            _end: Option<i64>,
        ) -> Result<BarSeries, DataError> {
            // Distinguishable quote closes: base close + 1.
            Ok(BarSeries::from_bars(
                "quote",
                Granularity::H1,
                base.iter()
                    .map(|b| Bar::new(b.timestamp, b.open, b.high, b.low, b.close + 1.0, b.volume))
                    .collect(),
            ))
        }

        async fn fetch_live_price(
            &self,
            _order: &Order,
        ) -> Result<tradebot_core::traits::LivePrice, DataError> {
            Err(DataError::Unsupported("live price".to_string()))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn bars(n: i64) -> Vec<Bar> {
        (1..=n)
            .map(|i| Bar::new(i, 100.0, 101.0, 99.0, 100.0 + i as f64, 1.0))
            .collect()
    }

    fn settings(period: usize) -> StrategySettings {
        StrategySettings {
            name: "counting".to_string(),
            instrument: "EURUSD".to_string(),
            granularities: vec![Granularity::H1],
            period,
            ..StrategySettings::default()
        }
    }

    fn long_market() -> OrderIntent {
        OrderIntent::Single(OrderDraft::market(Direction::Long))
    }

    async fn bot(
        period: usize,
        n_bars: i64,
        intent: fn() -> OrderIntent,
        venue: Arc<RecordingVenue>,
    ) -> (TradingBot, Arc<AtomicUsize>) {
        let signals = Arc::new(AtomicUsize::new(0));
        let strategy = Box::new(CountingStrategy {
            signals: Arc::clone(&signals),
            intent,
        });
        let bot = TradingBot::new(
            strategy,
            settings(period),
            RunConfig::default(),
            EmailSettings::default(),
            None,
            Arc::new(FixedFeed { bars: bars(n_bars) }),
            venue,
            None,
        )
        .await
        .unwrap();
        (bot, signals)
    }

    #[tokio::test]
    async fn insufficient_data_skips_the_strategy() {
        let venue = Arc::new(RecordingVenue::default());
        let (mut bot, signals) = bot(5, 10, long_market, Arc::clone(&venue)).await;

        // Cutoff 3 leaves two visible bars against a period of five.
        bot.update_continuous(3).await.unwrap();
        assert_eq!(signals.load(Ordering::SeqCst), 0);
        assert!(venue.placed.lock().unwrap().is_empty());

        // The skipped cycle must not have primed duplicate detection: the
        // same bar seen later, with enough history, still gets evaluated.
        bot.update_continuous(11).await.unwrap();
        assert_eq!(signals.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn duplicate_bar_suppresses_the_second_cycle() {
        let venue = Arc::new(RecordingVenue::default());
        let (mut bot, signals) = bot(3, 10, long_market, Arc::clone(&venue)).await;

        bot.update_continuous(8).await.unwrap();
        bot.update_continuous(8).await.unwrap();

        assert_eq!(signals.load(Ordering::SeqCst), 1);
        assert_eq!(venue.placed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn advancing_bars_are_each_evaluated() {
        let venue = Arc::new(RecordingVenue::default());
        let (mut bot, signals) = bot(3, 10, long_market, Arc::clone(&venue)).await;

        bot.update_continuous(8).await.unwrap();
        bot.update_continuous(9).await.unwrap();

        assert_eq!(signals.load(Ordering::SeqCst), 2);
        assert_eq!(venue.placed.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn long_order_is_priced_from_the_quote_series() {
        let venue = Arc::new(RecordingVenue::default());
        let (mut bot, _) = bot(3, 10, long_market, Arc::clone(&venue)).await;

        bot.update_continuous(8).await.unwrap();

        let placed = venue.placed.lock().unwrap();
        // Current bar is ts=7, close 107; the quote series carries close+1.
        assert_eq!(placed[0].price, rust_decimal_macros::dec!(108));
    }

    #[tokio::test]
    async fn periodic_cycles_bypass_duplicate_detection() {
        let venue = Arc::new(RecordingVenue::default());
        let (mut bot, signals) = bot(3, 10, long_market, Arc::clone(&venue)).await;

        bot.update_periodic(5).await.unwrap();
        bot.update_periodic(5).await.unwrap();

        assert_eq!(signals.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn iteration_range_requires_a_full_lookback() {
        let venue = Arc::new(RecordingVenue::default());
        let (bot, _) = bot(3, 10, long_market, Arc::clone(&venue)).await;
        assert_eq!(bot.iteration_range().unwrap(), (3, 10));

        let (bot, _) = bot_short().await;
        assert!(matches!(
            bot.iteration_range(),
            Err(DataError::InsufficientHistory {
                required: 20,
                available: 10
            })
        ));
    }

    async fn bot_short() -> (TradingBot, Arc<AtomicUsize>) {
        bot(20, 10, long_market, Arc::new(RecordingVenue::default())).await
    }

    #[tokio::test]
    async fn empty_intent_places_nothing() {
        let venue = Arc::new(RecordingVenue::default());
        let (mut bot, signals) = bot(3, 10, OrderIntent::none, Arc::clone(&venue)).await;

        bot.update_continuous(8).await.unwrap();

        assert_eq!(signals.load(Ordering::SeqCst), 1);
        assert!(venue.placed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn live_orders_are_recorded_through_the_notifier() {
        let venue = Arc::new(RecordingVenue::default());
        let notifier = Arc::new(CountingNotifier::default());
        let signals = Arc::new(AtomicUsize::new(0));
        let strategy = Box::new(CountingStrategy {
            signals: Arc::clone(&signals),
            intent: long_market,
        });
        let run = RunConfig {
            backtest_mode: false,
            notify: 1,
            ..RunConfig::default()
        };
        let mut bot = TradingBot::new(
            strategy,
            settings(3),
            run,
            EmailSettings::default(),
            None,
            Arc::new(FixedFeed { bars: bars(10) }),
            Arc::clone(&venue) as Arc<dyn Venue>,
            Some(Arc::clone(&notifier) as Arc<dyn Notifier>),
        )
        .await
        .unwrap();

        bot.update_continuous(8).await.unwrap();

        assert_eq!(notifier.records.load(Ordering::SeqCst), 1);
        assert_eq!(venue.placed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn scan_hits_are_reported_through_the_notifier() {
        let venue = Arc::new(RecordingVenue::default());
        let notifier = Arc::new(CountingNotifier::default());
        let signals = Arc::new(AtomicUsize::new(0));
        let strategy = Box::new(CountingStrategy {
            signals: Arc::clone(&signals),
            intent: long_market,
        });
        let run = RunConfig {
            scan_mode: true,
            notify: 1,
            ..RunConfig::default()
        };
        let email = EmailSettings {
            sender: Some("bot@example.com".to_string()),
            recipients: vec!["ops@example.com".to_string()],
        };
        let mut bot = TradingBot::new(
            strategy,
            settings(3),
            run,
            email,
            None,
            Arc::new(FixedFeed { bars: bars(10) }),
            Arc::clone(&venue) as Arc<dyn Venue>,
            Some(Arc::clone(&notifier) as Arc<dyn Notifier>),
        )
        .await
        .unwrap();

        bot.update_continuous(8).await.unwrap();

        assert_eq!(notifier.scans.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.records.load(Ordering::SeqCst), 0);
        assert!(venue.placed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn positions_reach_the_strategy_only_when_requested() {
        let observed = Arc::new(Mutex::new(Vec::new()));

        let venue = Arc::new(PositionCountingVenue::default());
        let mut with_positions = settings(3);
        with_positions.include_positions = true;
        let mut bot = TradingBot::new(
            Box::new(PositionAwareStrategy {
                observed: Arc::clone(&observed),
            }),
            with_positions,
            RunConfig::default(),
            EmailSettings::default(),
            None,
            Arc::new(FixedFeed { bars: bars(10) }),
            Arc::clone(&venue) as Arc<dyn Venue>,
            None,
        )
        .await
        .unwrap();
        bot.update_periodic(5).await.unwrap();

        assert_eq!(venue.position_calls.load(Ordering::SeqCst), 1);
        assert_eq!(observed.lock().unwrap().as_slice(), &[true]);

        // Without the flag the venue is never consulted and the strategy
        // sees no positions.
        let venue = Arc::new(PositionCountingVenue::default());
        let mut bot = TradingBot::new(
            Box::new(PositionAwareStrategy {
                observed: Arc::clone(&observed),
            }),
            settings(3),
            RunConfig::default(),
            EmailSettings::default(),
            None,
            Arc::new(FixedFeed { bars: bars(10) }),
            Arc::clone(&venue) as Arc<dyn Venue>,
            None,
        )
        .await
        .unwrap();
        bot.update_periodic(5).await.unwrap();

        assert_eq!(venue.position_calls.load(Ordering::SeqCst), 0);
        assert_eq!(observed.lock().unwrap().as_slice(), &[true, false]);
    }

    #[tokio::test]
    async fn scan_mode_records_hits_instead_of_submitting() {
        let venue = Arc::new(RecordingVenue::default());
        let signals = Arc::new(AtomicUsize::new(0));
        let strategy = Box::new(CountingStrategy {
            signals: Arc::clone(&signals),
            intent: long_market,
        });
        let run = RunConfig {
            scan_mode: true,
            ..RunConfig::default()
        };
        let mut bot = TradingBot::new(
            strategy,
            settings(3),
            run,
            EmailSettings::default(),
            None,
            Arc::new(FixedFeed { bars: bars(10) }),
            Arc::clone(&venue) as Arc<dyn Venue>,
            None,
        )
        .await
        .unwrap();

        bot.update_continuous(8).await.unwrap();

        assert!(venue.placed.lock().unwrap().is_empty());
        let hit = bot.scan_results().get("EURUSD").expect("hit recorded");
        assert_eq!(hit.signal, Some(Direction::Long));
        assert_eq!(hit.entry, rust_decimal_macros::dec!(108));
    }
}
