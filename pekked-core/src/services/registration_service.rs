//! Name registration workflow

use std::sync::Arc;

use pekked_provider::{TxHash, Wei};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{CoreError, CoreResult};
use crate::services::{log_failure, price, RegistryReader, ServiceContext};
use crate::types::{Candidate, RegistrationStep, TxKind};

/// Result of the best-effort record write that follows a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordWrite {
    Confirmed(TxHash),
    Reverted(TxHash),
    Failed(String),
}

/// A confirmed reservation.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub price: Wei,
    pub register_tx: TxHash,
    /// Block explorer page of the reservation
    pub explorer_url: Option<String>,
    pub record: RecordWrite,
    /// Delayed list refresh, already scheduled
    pub refresh: JoinHandle<()>,
}

#[derive(Debug)]
pub enum RegistrationOutcome {
    /// Another submission was in flight; nothing was sent
    AlreadyInFlight,
    Registered(Registration),
}

/// Registration workflow service
///
/// Validates and prices the candidate, reserves the name, writes its record
/// and schedules a list refresh. Every step is published on a watch channel.
pub struct RegistrationService {
    ctx: Arc<ServiceContext>,
    reader: Arc<RegistryReader>,
    step: watch::Sender<RegistrationStep>,
}

impl RegistrationService {
    /// Create a registration service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, reader: Arc<RegistryReader>) -> Self {
        let (step, _) = watch::channel(RegistrationStep::Idle);
        Self { ctx, reader, step }
    }

    pub fn subscribe(&self) -> watch::Receiver<RegistrationStep> {
        self.step.subscribe()
    }

    pub fn step(&self) -> RegistrationStep {
        self.step.borrow().clone()
    }

    /// Run the workflow for `candidate`.
    ///
    /// A no-op while another submission holds the slot. On failure the step
    /// rests at [`RegistrationStep::Failed`] and the error is returned; no
    /// confirmed step is rolled back.
    pub async fn register(&self, candidate: &Candidate) -> CoreResult<RegistrationOutcome> {
        let Some(_permit) = self.ctx.try_begin_submission() else {
            log::debug!("[registration] Submission already in flight, ignoring");
            return Ok(RegistrationOutcome::AlreadyInFlight);
        };

        match self.run(candidate).await {
            Ok(registration) => {
                self.publish(RegistrationStep::Idle);
                Ok(RegistrationOutcome::Registered(registration))
            }
            Err(e) => {
                log_failure("registration", "Registration failed", &e);
                self.publish(RegistrationStep::Failed(e.user_message()));
                Err(e)
            }
        }
    }

    async fn run(&self, candidate: &Candidate) -> CoreResult<Registration> {
        self.publish(RegistrationStep::Validating);
        let name = candidate.name.as_str();
        let price = price(name)?;

        self.ctx.ensure_ready_to_submit().await?;
        let registry = self.ctx.registry()?;
        log::info!(
            "[registration] Minting domain {name} with price {}",
            price.format_ether()
        );

        self.publish(RegistrationStep::AwaitingSignature(TxKind::Register));
        let register_tx = registry.register(name, price).await?;

        self.publish(RegistrationStep::Confirming(TxKind::Register));
        let receipt = registry
            .wait(&register_tx)
            .await
            .map_err(|e| CoreError::TransactionNeverConfirmed(e.to_string()))?;
        if !receipt.is_success() {
            return Err(CoreError::TransactionReverted(register_tx.to_string()));
        }

        let explorer_url = self.ctx.settings.required_network.tx_url(&register_tx);
        log::info!(
            "[registration] Domain minted! {}",
            explorer_url.as_deref().unwrap_or(register_tx.0.as_str())
        );

        let record = self.write_record(name, &candidate.record).await;

        self.publish(RegistrationStep::Refreshing);
        let refresh = self.schedule_refresh();

        Ok(Registration {
            name: name.to_string(),
            price,
            register_tx,
            explorer_url,
            record,
            refresh,
        })
    }

    /// Best effort: failures are logged and reported, never raised.
    async fn write_record(&self, name: &str, record: &str) -> RecordWrite {
        let registry = match self.ctx.registry() {
            Ok(registry) => registry,
            Err(e) => return RecordWrite::Failed(e.to_string()),
        };

        self.publish(RegistrationStep::AwaitingSignature(TxKind::Record));
        let tx = match registry.set_record(name, record).await {
            Ok(tx) => tx,
            Err(e) => {
                log::warn!("[registration] Record for {name} was not submitted: {e}");
                return RecordWrite::Failed(e.to_string());
            }
        };

        self.publish(RegistrationStep::Confirming(TxKind::Record));
        match registry.wait(&tx).await {
            Ok(receipt) if receipt.is_success() => {
                let link = self.ctx.settings.required_network.tx_url(&tx);
                log::info!(
                    "[registration] Record set! {}",
                    link.as_deref().unwrap_or(tx.0.as_str())
                );
                RecordWrite::Confirmed(tx)
            }
            Ok(_) => {
                log::warn!("[registration] Record transaction {tx} for {name} reverted");
                RecordWrite::Reverted(tx)
            }
            Err(e) => {
                log::warn!("[registration] Record transaction {tx} for {name} not confirmed: {e}");
                RecordWrite::Failed(e.to_string())
            }
        }
    }

    fn schedule_refresh(&self) -> JoinHandle<()> {
        let reader = Arc::clone(&self.reader);
        let delay = self.ctx.settings.refresh_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Failures are logged by the reader; the previous list stays
            let _ = reader.refresh().await;
        })
    }

    fn publish(&self, step: RegistrationStep) {
        log::debug!("[registration] Step {step:?}");
        self.step.send_replace(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NAME_TOO_SHORT, TRANSACTION_FAILED};
    use crate::test_utils::{
        create_registration_service, session_address, MockWallet, TxMode,
    };
    use crate::types::WorkflowStatus;
    use pekked_provider::ChainId;

    fn unwrap_registered(outcome: RegistrationOutcome) -> Registration {
        match outcome {
            RegistrationOutcome::Registered(r) => r,
            RegistrationOutcome::AlreadyInFlight => panic!("expected a registration"),
        }
    }

    #[tokio::test]
    async fn short_name_never_reaches_wallet() {
        let wallet = Arc::new(MockWallet::on_required_network());
        let (svc, registry, _) = create_registration_service(wallet.clone());

        let err = svc.register(&Candidate::new("ab", "x")).await.unwrap_err();

        assert_eq!(err.user_message(), NAME_TOO_SHORT);
        assert_eq!(registry.register_calls(), 0);
        assert_eq!(registry.set_record_calls(), 0);
        assert_eq!(wallet.total_calls(), 0);
        assert_eq!(svc.step(), RegistrationStep::Failed(NAME_TOO_SHORT.into()));
    }

    #[tokio::test]
    async fn successful_registration_refreshes_list() {
        let wallet = Arc::new(MockWallet::on_required_network());
        let (svc, registry, reader) = create_registration_service(wallet);

        let registration =
            unwrap_registered(svc.register(&Candidate::new("cat", "meow")).await.unwrap());

        assert_eq!(registration.price, Wei::from_finney(500));
        assert!(matches!(registration.record, RecordWrite::Confirmed(_)));
        assert!(registration
            .explorer_url
            .as_deref()
            .unwrap()
            .starts_with("https://mumbai.polygonscan.com/tx/0x"));
        assert_eq!(registry.paid_for("cat").await, Some(Wei::from_finney(500)));

        registration.refresh.await.unwrap();
        let mints = reader.snapshot().await;
        assert_eq!(mints.len(), 1);
        assert_eq!(mints[0].name, "cat");
        assert_eq!(mints[0].record, "meow");
        assert!(mints[0].is_owned_by(&session_address()));
        assert_eq!(svc.step(), RegistrationStep::Idle);
    }

    #[tokio::test]
    async fn reverted_reservation_skips_record() {
        let wallet = Arc::new(MockWallet::on_required_network());
        let (svc, registry, _) = create_registration_service(wallet);
        registry.set_register_mode(TxMode::Revert).await;

        let candidate = Candidate::new("cat", "meow");
        let err = svc.register(&candidate).await.unwrap_err();

        assert!(matches!(err, CoreError::TransactionReverted(_)));
        assert_eq!(err.user_message(), TRANSACTION_FAILED);
        assert_eq!(registry.set_record_calls(), 0);
        assert_eq!(candidate, Candidate::new("cat", "meow"));
        assert_eq!(svc.step().status(), WorkflowStatus::Failed);

        // Failed is a resting state; the next attempt is accepted
        registry.set_register_mode(TxMode::Confirm).await;
        assert!(matches!(
            svc.register(&candidate).await.unwrap(),
            RegistrationOutcome::Registered(_)
        ));
    }

    #[tokio::test]
    async fn unconfirmed_reservation_skips_record() {
        let wallet = Arc::new(MockWallet::on_required_network());
        let (svc, registry, _) = create_registration_service(wallet);
        registry.set_register_mode(TxMode::NeverConfirm).await;

        let err = svc.register(&Candidate::new("cat", "meow")).await.unwrap_err();

        assert!(matches!(err, CoreError::TransactionNeverConfirmed(_)));
        assert_eq!(registry.set_record_calls(), 0);
    }

    #[tokio::test]
    async fn rejected_signature_is_transaction_failure() {
        let wallet = Arc::new(MockWallet::on_required_network());
        let (svc, registry, _) = create_registration_service(wallet);
        registry.set_register_mode(TxMode::RejectSubmit).await;

        let err = svc.register(&Candidate::new("cat", "meow")).await.unwrap_err();

        assert!(matches!(err, CoreError::UserRejected));
        assert_eq!(err.user_message(), TRANSACTION_FAILED);
        assert_eq!(registry.set_record_calls(), 0);
    }

    #[tokio::test]
    async fn failed_record_write_does_not_fail_registration() {
        let wallet = Arc::new(MockWallet::on_required_network());
        let (svc, registry, _) = create_registration_service(wallet);
        registry.set_record_mode(TxMode::Revert).await;

        let registration =
            unwrap_registered(svc.register(&Candidate::new("cat", "meow")).await.unwrap());

        assert!(matches!(registration.record, RecordWrite::Reverted(_)));
        assert_eq!(registry.register_calls(), 1);
        assert_eq!(registry.owner_of("cat").await, Some(session_address()));
    }

    #[tokio::test]
    async fn wrong_network_blocks_submission() {
        let wallet = Arc::new(MockWallet::on_chain(ChainId(1)));
        let (svc, registry, _) = create_registration_service(wallet);

        let err = svc.register(&Candidate::new("cat", "meow")).await.unwrap_err();

        assert!(matches!(err, CoreError::WrongNetwork { .. }));
        assert_eq!(registry.register_calls(), 0);
    }

    #[tokio::test]
    async fn reinvocation_while_in_flight_is_noop() {
        let wallet = Arc::new(MockWallet::on_required_network());
        let (svc, registry, _) = create_registration_service(wallet);
        let gate = registry.hold_register().await;
        let svc = Arc::new(svc);

        let first = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.register(&Candidate::new("cat", "meow")).await })
        };
        registry.wait_for_register_calls(1).await;

        let second = svc.register(&Candidate::new("dog", "woof")).await.unwrap();
        assert!(matches!(second, RegistrationOutcome::AlreadyInFlight));

        gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, RegistrationOutcome::Registered(_)));
        assert_eq!(registry.register_calls(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_resting_step() {
        let wallet = Arc::new(MockWallet::on_required_network());
        let (svc, registry, _) = create_registration_service(wallet);
        let rx = svc.subscribe();

        svc.register(&Candidate::new("cat", "meow")).await.unwrap();
        assert_eq!(*rx.borrow(), RegistrationStep::Idle);

        registry.set_register_mode(TxMode::Revert).await;
        svc.register(&Candidate::new("dog", "woof")).await.unwrap_err();
        assert_eq!(
            *rx.borrow(),
            RegistrationStep::Failed(TRANSACTION_FAILED.into())
        );
    }
}
