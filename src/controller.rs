//! Approve-then-airdrop submission controller
//!
//! A submission walks an explicit state machine:
//!
//! ```text
//! Idle -> CheckingAllowance -> [Approving -> AwaitingApprovalReceipt] ->
//!         Submitting -> AwaitingAirdropReceipt -> Done
//! ```
//!
//! Any error moves it to `Failed`. The approval leg is skipped when the
//! current allowance already covers the total. Every state change is
//! published on a watch channel.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes, U256};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info};

use crate::abi::{Abis, FN_AIRDROP, FN_APPROVE};
use crate::chain::{ContractReader, ContractWriter, ReceiptWaiter, TxReceipt};
use crate::error::{AirdropError, Result};
use crate::form::AirdropForm;
use crate::intent::{parse_address, TransactionIntent};
use crate::networks::NetworkTable;
use crate::token::{read_allowance, read_decimals};

/// Where a submission currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionState {
    Idle,
    CheckingAllowance,
    Approving,
    AwaitingApprovalReceipt,
    Submitting,
    AwaitingAirdropReceipt,
    Done,
    Failed,
}

impl SubmissionState {
    pub fn is_in_flight(&self) -> bool {
        !matches!(self, Self::Idle | Self::Done | Self::Failed)
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "Idle",
            Self::CheckingAllowance => "Checking allowance",
            Self::Approving => "Submitting approval",
            Self::AwaitingApprovalReceipt => "Waiting for approval receipt",
            Self::Submitting => "Submitting airdrop",
            Self::AwaitingAirdropReceipt => "Waiting for airdrop receipt",
            Self::Done => "Done",
            Self::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Network and account the submission runs against
#[derive(Debug, Clone, Copy)]
pub struct SubmissionContext {
    pub chain_id: u64,
    pub account: Address,
}

/// Everything read and computed before the first write
#[derive(Debug, Clone, Serialize)]
pub struct AirdropPlan {
    pub spender: Address,
    pub decimals: u8,
    pub intent: TransactionIntent,
    pub allowance: U256,
}

impl AirdropPlan {
    pub fn needs_approval(&self) -> bool {
        self.allowance < self.intent.total_amount()
    }

    /// `approve(spender, total)` arguments; the approval is never unlimited
    pub fn approve_args(&self) -> Vec<DynSolValue> {
        vec![
            DynSolValue::Address(self.spender),
            DynSolValue::Uint(self.intent.total_amount(), 256),
        ]
    }

    /// Encoded `airdropERC20` call data
    pub fn airdrop_calldata(&self, abi: &JsonAbi) -> Result<Bytes> {
        let function = abi
            .function(FN_AIRDROP)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| AirdropError::Encoding(format!("Function '{}' not found in ABI", FN_AIRDROP)))?;

        let encoded = function
            .abi_encode_input(&self.intent.airdrop_args())
            .map_err(|e| AirdropError::Encoding(format!("Failed to encode function data: {}", e)))?;

        Ok(Bytes::from(encoded))
    }
}

/// Result of a successful submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub approval: Option<TxReceipt>,
    pub airdrop: TxReceipt,
    pub plan: AirdropPlan,
}

impl SubmissionOutcome {
    pub fn notice(&self) -> String {
        format!(
            "Airdrop Successful! Transaction Hash: {}",
            self.airdrop.transaction_hash
        )
    }
}

/// Clears the busy flag on every exit path
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(AirdropError::Busy);
        }
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Drives the approve-then-airdrop sequence over the injected collaborators
pub struct AirdropController {
    reader: Arc<dyn ContractReader>,
    writer: Arc<dyn ContractWriter>,
    waiter: Arc<dyn ReceiptWaiter>,
    networks: NetworkTable,
    abis: Abis,
    form: AirdropForm,
    busy: Arc<AtomicBool>,
    state: watch::Sender<SubmissionState>,
}

impl AirdropController {
    pub fn new(
        reader: Arc<dyn ContractReader>,
        writer: Arc<dyn ContractWriter>,
        waiter: Arc<dyn ReceiptWaiter>,
        networks: NetworkTable,
        abis: Abis,
        form: AirdropForm,
    ) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            reader,
            writer,
            waiter,
            networks,
            abis,
            form,
            busy: Arc::new(AtomicBool::new(false)),
            state,
        }
    }

    /// Use one client for reads, writes and receipts
    pub fn with_client<C>(client: Arc<C>, networks: NetworkTable, abis: Abis, form: AirdropForm) -> Self
    where
        C: ContractReader + ContractWriter + ReceiptWaiter + 'static,
    {
        Self::new(client.clone(), client.clone(), client, networks, abis, form)
    }

    pub fn form(&self) -> &AirdropForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AirdropForm {
        &mut self.form
    }

    pub fn abis(&self) -> &Abis {
        &self.abis
    }

    pub fn networks(&self) -> &NetworkTable {
        &self.networks
    }

    pub fn reader(&self) -> &dyn ContractReader {
        self.reader.as_ref()
    }

    /// Shared busy flag, set while a submission is in flight
    pub fn busy_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.busy)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SubmissionState {
        *self.state.borrow()
    }

    /// Receive every state transition
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Resolve the spender, build the intent and read the allowance.
    ///
    /// Nothing is written. An unknown network fails before any read.
    pub async fn prepare(&self, ctx: &SubmissionContext) -> Result<AirdropPlan> {
        let spender = self.networks.spender_for(ctx.chain_id)?;
        let token = parse_address(self.form.token_address(), "token")?;

        let decimals = read_decimals(self.reader.as_ref(), &self.abis, token).await?;
        let intent = TransactionIntent::build(
            self.form.token_address(),
            self.form.recipients(),
            self.form.amounts(),
            decimals,
        )?;

        let allowance = read_allowance(self.reader.as_ref(), &self.abis, token, ctx.account, spender).await?;
        info!(
            "Allowance of {} toward {}: {} (needed {})",
            ctx.account,
            spender,
            allowance,
            intent.total_amount()
        );

        Ok(AirdropPlan {
            spender,
            decimals,
            intent,
            allowance,
        })
    }

    /// Run the full sequence.
    ///
    /// On success recipients and amounts are cleared; on failure the form is
    /// left untouched so the user can retry. Nothing is retried here.
    pub async fn submit(&mut self, ctx: &SubmissionContext) -> Result<SubmissionOutcome> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        match self.run(ctx).await {
            Ok(outcome) => {
                self.form.clear_batch();
                self.transition(SubmissionState::Done);
                info!("Airdrop confirmed: {}", outcome.airdrop.transaction_hash);
                Ok(outcome)
            }
            Err(e) => {
                self.transition(SubmissionState::Failed);
                error!("Airdrop submission failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run(&self, ctx: &SubmissionContext) -> Result<SubmissionOutcome> {
        self.transition(SubmissionState::CheckingAllowance);
        let plan = self.prepare(ctx).await?;

        let approval = if plan.needs_approval() {
            self.transition(SubmissionState::Approving);
            let tx_hash = self
                .writer
                .write(&self.abis.erc20, plan.intent.token_address(), FN_APPROVE, &plan.approve_args())
                .await?;
            info!("Approval submitted: {}", tx_hash);

            self.transition(SubmissionState::AwaitingApprovalReceipt);
            let receipt = self.waiter.wait_for_receipt(tx_hash).await?.ensure_success()?;
            info!("Approval confirmed in block {:?}", receipt.block_number);
            Some(receipt)
        } else {
            None
        };

        self.transition(SubmissionState::Submitting);
        let tx_hash = self
            .writer
            .write(&self.abis.airdrop, plan.spender, FN_AIRDROP, &plan.intent.airdrop_args())
            .await?;
        info!(
            "Airdrop submitted: {} ({} recipients)",
            tx_hash,
            plan.intent.recipients().len()
        );

        self.transition(SubmissionState::AwaitingAirdropReceipt);
        let airdrop = self.waiter.wait_for_receipt(tx_hash).await?.ensure_success()?;

        Ok(SubmissionOutcome {
            approval,
            airdrop,
            plan,
        })
    }

    fn transition(&self, state: SubmissionState) {
        info!("Submission state: {}", state);
        self.state.send_replace(state);
    }
}
