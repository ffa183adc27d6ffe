//! In-memory wallet for tests: an EIP-1193 provider with scripted responses,
//! a trigger source fired by hand and a notifier that records everything.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use alloy_primitives::{hex, Address, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use serde_json::{json, Value};

use crate::erc20::IERC20;
use crate::events::Teardown;
use crate::notify::{Notification, Notifier};
use crate::provider::{methods, Eip1193Provider, Listener, ListenerId, ProviderEvent, ProviderRpcError};
use crate::sync::SyncTriggerSource;

pub const ALICE: &str = "0x1111111111111111111111111111111111111111";
pub const BOB: &str = "0x2222222222222222222222222222222222222222";
pub const USDC_MAINNET: &str = "0xA0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
pub const BSC_TESTNET_USDC: &str = "0xb32B8625D2708FC7E7041BE4169EB188eeea3c14";
pub const BSC_TESTNET_USDT: &str = "0x222D12d538b7FB8B17723322aF40379D51C70372";

#[derive(Clone)]
enum MockToken {
    Deployed { balance: U256, decimals: u8 },
    Failing(String),
}

type Gate = Shared<oneshot::Receiver<()>>;

pub struct MockProvider {
    chain: RefCell<String>,
    accounts: RefCell<Vec<String>>,
    request_accounts: RefCell<Result<Vec<String>, ProviderRpcError>>,
    read_failure: RefCell<Option<String>>,
    tokens: RefCell<HashMap<String, MockToken>>,
    balances: RefCell<HashMap<(String, String), U256>>,
    gates: RefCell<HashMap<String, (Option<oneshot::Sender<()>>, Gate)>>,
    calls: RefCell<Vec<String>>,
    listeners: RefCell<Vec<(ProviderEvent, ListenerId, Listener)>>,
    removed: RefCell<Vec<ProviderEvent>>,
    next_listener: Cell<u64>,
    remove_supported: Cell<bool>,
    flags: RefCell<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            chain: RefCell::new("0x1".to_string()),
            accounts: RefCell::new(Vec::new()),
            request_accounts: RefCell::new(Ok(vec![ALICE.to_string()])),
            read_failure: RefCell::new(None),
            tokens: RefCell::new(HashMap::new()),
            balances: RefCell::new(HashMap::new()),
            gates: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            removed: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            remove_supported: Cell::new(true),
            flags: RefCell::new(vec!["isMetaMask".to_string()]),
        }
    }

    // region:    --- Scripting

    pub fn set_chain(&self, chain: &str) {
        *self.chain.borrow_mut() = chain.to_string();
    }

    pub fn set_accounts(&self, accounts: &[&str]) {
        *self.accounts.borrow_mut() = accounts.iter().map(|a| a.to_string()).collect();
    }

    /// Outcome of the next `eth_requestAccounts`. Success also authorizes the accounts.
    pub fn set_request_accounts(&self, result: Result<Vec<String>, ProviderRpcError>) {
        *self.request_accounts.borrow_mut() = result;
    }

    /// Make `eth_chainId` and `eth_accounts` fail.
    pub fn fail_reads(&self, message: &str) {
        *self.read_failure.borrow_mut() = Some(message.to_string());
    }

    /// Deploy an ERC-20 at `token`; every owner holds `balance` unless overridden.
    pub fn set_token(&self, token: &str, balance: U256, decimals: u8) {
        self.tokens
            .borrow_mut()
            .insert(token.to_lowercase(), MockToken::Deployed { balance, decimals });
    }

    pub fn set_balance(&self, token: &str, owner: &str, balance: U256) {
        self.balances
            .borrow_mut()
            .insert((token.to_lowercase(), owner.to_lowercase()), balance);
    }

    /// Every `eth_call` to `token` fails with `message`.
    pub fn fail_token(&self, token: &str, message: &str) {
        self.tokens
            .borrow_mut()
            .insert(token.to_lowercase(), MockToken::Failing(message.to_string()));
    }

    /// Hold `balanceOf(owner)` calls until [`release_owner`](Self::release_owner).
    pub fn gate_owner(&self, owner: &str) {
        self.gate(owner.to_lowercase());
    }

    pub fn release_owner(&self, owner: &str) {
        self.release(&owner.to_lowercase());
    }

    /// Hold every `method` request until [`release_method`](Self::release_method).
    ///
    /// The response is computed after the release, so scripting done while
    /// the call is held still applies.
    pub fn gate_method(&self, method: &str) {
        self.gate(method.to_string());
    }

    pub fn release_method(&self, method: &str) {
        self.release(method);
    }

    fn gate(&self, key: String) {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(key, (Some(tx), rx.shared()));
    }

    fn release(&self, key: &str) {
        if let Some((tx, _)) = self.gates.borrow_mut().get_mut(key) {
            if let Some(tx) = tx.take() {
                let _ = tx.send(());
            }
        }
    }

    async fn wait_gate(&self, key: &str) {
        let gate = self.gates.borrow().get(key).map(|(_, gate)| gate.clone());
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    pub fn set_flag(&self, flag: &str) {
        *self.flags.borrow_mut() = vec![flag.to_string()];
    }

    pub fn disable_remove_listener(&self) {
        self.remove_supported.set(false);
    }

    /// Deliver a notification to every listener registered for `event`.
    pub fn emit(&self, event: ProviderEvent, payload: Value) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(e, _, _)| *e == event)
            .map(|(_, _, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(payload.clone());
        }
    }

    // endregion: --- Scripting

    // region:    --- Inspection

    pub fn count_calls(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|m| *m == method).count()
    }

    pub fn listener_count(&self, event: ProviderEvent) -> usize {
        self.listeners.borrow().iter().filter(|(e, _, _)| *e == event).count()
    }

    pub fn remove_count(&self, event: ProviderEvent) -> usize {
        self.removed.borrow().iter().filter(|e| **e == event).count()
    }

    // endregion: --- Inspection

    fn read_failure(&self) -> Result<(), ProviderRpcError> {
        match self.read_failure.borrow().as_ref() {
            Some(message) => Err(ProviderRpcError::new(-32603, message.clone())),
            None => Ok(()),
        }
    }

    async fn eth_call(&self, params: Option<Value>) -> Result<Value, ProviderRpcError> {
        let params = params.unwrap_or(Value::Null);
        let call = &params[0];
        let to = call["to"].as_str().unwrap_or_default().to_lowercase();
        let data = hex::decode(call["data"].as_str().unwrap_or_default())
            .map_err(|e| ProviderRpcError::new(-32602, e.to_string()))?;

        let token = self.tokens.borrow().get(&to).cloned();
        let (balance, decimals) = match token {
            None => return Ok(json!("0x")),
            Some(MockToken::Failing(message)) => return Err(ProviderRpcError::new(-32603, message)),
            Some(MockToken::Deployed { balance, decimals }) => (balance, decimals),
        };

        let word = if data.starts_with(&IERC20::balanceOfCall::SELECTOR) {
            let owner = hex::encode_prefixed(Address::from_slice(&data[16..36]));
            self.wait_gate(&owner).await;
            self.balances.borrow().get(&(to, owner)).copied().unwrap_or(balance)
        } else if data.starts_with(&IERC20::decimalsCall::SELECTOR) {
            U256::from(decimals)
        } else {
            return Ok(json!("0x"));
        };

        Ok(json!(hex::encode_prefixed(word.to_be_bytes::<32>())))
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for MockProvider {
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, ProviderRpcError> {
        self.calls.borrow_mut().push(method.to_string());
        self.wait_gate(method).await;

        match method {
            methods::ETH_CHAIN_ID => {
                self.read_failure()?;
                Ok(json!(self.chain.borrow().clone()))
            }
            methods::ETH_ACCOUNTS => {
                self.read_failure()?;
                Ok(json!(self.accounts.borrow().clone()))
            }
            methods::ETH_REQUEST_ACCOUNTS => {
                let result = self.request_accounts.borrow().clone();
                let accounts = result?;
                *self.accounts.borrow_mut() = accounts.clone();
                Ok(json!(accounts))
            }
            methods::ETH_CALL => self.eth_call(params).await,
            other => Err(ProviderRpcError::internal(format!("Unsupported method: {}", other))),
        }
    }

    fn on(&self, event: ProviderEvent, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((event, id, listener));
        id
    }

    fn remove_listener(&self, event: ProviderEvent, id: ListenerId) {
        self.removed.borrow_mut().push(event);
        self.listeners.borrow_mut().retain(|(e, i, _)| !(*e == event && *i == id));
    }

    fn supports_remove_listener(&self) -> bool {
        self.remove_supported.get()
    }

    fn has_flag(&self, flag: &str) -> bool {
        self.flags.borrow().iter().any(|f| f == flag)
    }
}

/// Sync trigger source fired by [`ManualTriggers::fire`].
#[derive(Default)]
pub struct ManualTriggers {
    callbacks: Rc<RefCell<Vec<(u64, Rc<dyn Fn()>)>>>,
    next_id: Cell<u64>,
}

impl ManualTriggers {
    pub fn fire(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> = self.callbacks.borrow().iter().map(|(_, c)| c.clone()).collect();
        for callback in callbacks {
            callback();
        }
    }

    pub fn attached(&self) -> usize {
        self.callbacks.borrow().len()
    }
}

impl SyncTriggerSource for ManualTriggers {
    fn attach(&self, on_trigger: Rc<dyn Fn()>) -> Teardown {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.callbacks.borrow_mut().push((id, on_trigger));

        let callbacks = self.callbacks.clone();
        Teardown::new(move || callbacks.borrow_mut().retain(|(i, _)| *i != id))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<Notification> {
        self.seen.borrow().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.borrow_mut().push(notification);
    }
}
