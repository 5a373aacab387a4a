//! Block ingestion pipeline.
//!
//! One producer (the external chain watcher) feeds confirmed blocks into a
//! bounded queue; a single consumer task packages each block's
//! overlay-relevant transactions, persists the raw pack, and runs it
//! through the decoder into the ledger. The consumer is the sole ledger
//! mutator, so transaction application needs no cross-task locking and
//! preserves strict block-height then in-block order.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use umbra_chain::{ChainView, WatchedBlock};
use umbra_decoder::MessageDecoder;
use umbra_ledger::{ApplyOutcome, Ledger};
use umbra_store::pack::{InputOrigin, OverlayTx, PackStore, TxPack};
use umbra_store::StoreError;
use umbra_types::params::ACTIVATION_HEIGHT;
use umbra_types::HostAmount;

use crate::error::NodeError;

/// Producer handle for the external chain watcher.
///
/// `submit` applies backpressure: it suspends while the queue is full,
/// bounding memory growth when decoding falls behind block arrival.
#[derive(Clone)]
pub struct BlockQueue {
    tx: mpsc::Sender<WatchedBlock>,
}

impl BlockQueue {
    pub async fn submit(&self, block: WatchedBlock) -> Result<(), NodeError> {
        self.tx.send(block).await.map_err(|_| NodeError::QueueClosed)
    }
}

/// Counts of what one pack's application produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackOutcome {
    /// Messages applied to the ledger.
    pub applied: u64,
    /// Economically invalid messages (insufficient balance), reported and
    /// dropped.
    pub invalid: u64,
    /// Transactions or messages skipped by decode policy (unsupported tag,
    /// unresolved sender, malformed payload, reserved kind).
    pub skipped: u64,
}

/// Decode a pack and apply its messages to the ledger, in order.
///
/// This is the single code path shared by live ingestion and replay:
/// identical input must produce identical ledger mutations regardless of
/// entry point.
pub fn process_pack(
    decoder: &MessageDecoder,
    ledger: &Ledger,
    pack: &TxPack,
) -> Result<PackOutcome, NodeError> {
    let report = decoder.decode_pack(pack);
    let mut outcome = PackOutcome {
        skipped: report.skipped.len() as u64,
        ..PackOutcome::default()
    };

    for message in &report.messages {
        match ledger.apply(message)? {
            ApplyOutcome::Applied => outcome.applied += 1,
            ApplyOutcome::InsufficientBalance { .. } => outcome.invalid += 1,
            ApplyOutcome::SkippedReserved => outcome.skipped += 1,
        }
    }
    Ok(outcome)
}

/// The block ingestion pipeline: owns the queue and the consumer task.
pub struct IngestPipeline {
    decoder: Arc<MessageDecoder>,
    ledger: Ledger,
    packs: Arc<dyn PackStore>,
    chain: Arc<dyn ChainView>,
}

impl IngestPipeline {
    pub fn new(
        decoder: Arc<MessageDecoder>,
        ledger: Ledger,
        packs: Arc<dyn PackStore>,
        chain: Arc<dyn ChainView>,
    ) -> Self {
        Self {
            decoder,
            ledger,
            packs,
            chain,
        }
    }

    /// Start the consumer task. Returns the producer handle for the chain
    /// watcher and the consumer's join handle.
    ///
    /// The consumer runs until the queue closes, a shutdown signal arrives,
    /// or a storage failure makes continuing unsafe. On shutdown it drains
    /// and discards any still-queued blocks without processing them.
    pub fn spawn(
        self,
        capacity: usize,
        mut shutdown: broadcast::Receiver<()>,
    ) -> (BlockQueue, JoinHandle<Result<(), NodeError>>) {
        let (tx, mut rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(async move {
            tracing::info!("block ingestion pipeline started");
            loop {
                tokio::select! {
                    maybe_block = rx.recv() => {
                        match maybe_block {
                            Some(block) => {
                                if let Err(err) = self.handle_block(block) {
                                    tracing::error!(%err, "pipeline stopping: storage failure");
                                    return Err(err);
                                }
                            }
                            None => break,
                        }
                    }
                    _ = shutdown.recv() => {
                        let mut discarded = 0usize;
                        while rx.try_recv().is_ok() {
                            discarded += 1;
                        }
                        tracing::info!(discarded, "shutdown: drained queued blocks");
                        break;
                    }
                }
            }
            tracing::info!("block ingestion pipeline stopped");
            Ok(())
        });
        (BlockQueue { tx }, handle)
    }

    /// Process one confirmed block.
    ///
    /// Per-block recoverable problems (chain-watcher read failures, an
    /// already-persisted height) are logged and skipped; only storage
    /// failures propagate, stopping the pipeline.
    fn handle_block(&self, block: WatchedBlock) -> Result<(), NodeError> {
        if block.height < ACTIVATION_HEIGHT {
            // The overlay protocol did not exist yet; skip before any
            // decode work.
            tracing::trace!(height = block.height, "block below activation height");
            return Ok(());
        }

        let txs = match self.collect_overlay_transactions(&block) {
            Ok(txs) => txs,
            Err(err) => {
                tracing::warn!(height = block.height, %err, "skipping block: chain watcher failure");
                return Ok(());
            }
        };
        if txs.is_empty() {
            return Ok(());
        }
        tracing::info!(
            height = block.height,
            count = txs.len(),
            "block carries overlay transactions"
        );

        let pack = TxPack {
            height: block.height,
            time: block.time,
            txs,
        };

        // Persist the raw pack before applying: replay must be able to
        // reconstruct everything the live path saw.
        match self.packs.persist_pack(&pack) {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                tracing::warn!(height = pack.height, "pack already persisted; block not reapplied");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }

        let outcome = process_pack(&self.decoder, &self.ledger, &pack)?;
        tracing::info!(
            height = pack.height,
            applied = outcome.applied,
            invalid = outcome.invalid,
            skipped = outcome.skipped,
            "block processed"
        );
        Ok(())
    }

    /// The subset of a block's transactions carrying overlay payloads
    /// (marked by an output paying the exodus address), with each input's
    /// origin resolved and embedded.
    fn collect_overlay_transactions(
        &self,
        block: &WatchedBlock,
    ) -> Result<Vec<OverlayTx>, NodeError> {
        let inspector = self.decoder.inspector();
        let exodus = self.decoder.exodus_address();

        let mut overlay = Vec::new();
        for tx in &block.txs {
            let pays_exodus = tx.outputs.iter().any(|output| {
                inspector
                    .addresses(&output.script_pubkey)
                    .iter()
                    .any(|address| address == exodus)
            });
            if !pays_exodus {
                continue;
            }

            let mut origins = Vec::with_capacity(tx.inputs.len());
            for input in &tx.inputs {
                let origin = match self.chain.previous_output(&input.prevout)? {
                    Some(prev) => InputOrigin {
                        address: prev.address,
                        value: prev.value,
                    },
                    // Untraceable input (pruned history): recorded as such
                    // so sender resolution can ignore it.
                    None => InputOrigin {
                        address: None,
                        value: HostAmount::ZERO,
                    },
                };
                origins.push(origin);
            }
            overlay.push(OverlayTx {
                tx: tx.clone(),
                origins,
            });
        }
        Ok(overlay)
    }
}
