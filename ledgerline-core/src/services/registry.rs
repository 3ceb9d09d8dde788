//! Registry service - clients and accounts of one running ledger
//!
//! Each account sits behind its own mutex so operations on one account are
//! serialized while different accounts proceed in parallel. Client
//! membership is read-mostly and kept behind a single `RwLock`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::AccountSettings;
use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountNumber, Client, HistoryEntry, NewClient, TaxId, Transaction};

/// An account shared between the registry and its callers
pub type SharedAccount = Arc<Mutex<Account>>;

/// Row of the account listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub number: AccountNumber,
    pub agency: String,
    pub holder: String,
    pub tax_id: TaxId,
    pub balance: Decimal,
    pub withdrawals_performed: u32,
}

/// In-memory registry of clients and accounts
pub struct Registry {
    settings: AccountSettings,
    clients: RwLock<HashMap<TaxId, Client>>,
    accounts: RwLock<BTreeMap<AccountNumber, SharedAccount>>,
}

impl Registry {
    pub fn new(settings: AccountSettings) -> Self {
        Self {
            settings,
            clients: RwLock::new(HashMap::new()),
            accounts: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn settings(&self) -> &AccountSettings {
        &self.settings
    }

    /// Register a new client. The tax id must not be registered yet.
    pub fn register_client(&self, new_client: NewClient) -> Result<Client> {
        let client = Client::register(new_client)?;
        let mut clients = self
            .clients
            .write()
            .map_err(|e| Error::Lock(e.to_string()))?;

        if clients.contains_key(client.tax_id()) {
            return Err(Error::conflict(format!(
                "client already registered: {}",
                client.tax_id()
            )));
        }
        clients.insert(client.tax_id().clone(), client.clone());
        Ok(client)
    }

    /// Snapshot of the client registered under `tax_id`
    pub fn find_client(&self, tax_id: &TaxId) -> Result<Option<Client>> {
        let clients = self.clients.read().map_err(|e| Error::Lock(e.to_string()))?;
        Ok(clients.get(tax_id).cloned())
    }

    pub fn client_count(&self) -> Result<usize> {
        let clients = self.clients.read().map_err(|e| Error::Lock(e.to_string()))?;
        Ok(clients.len())
    }

    /// Open a checking account for the client, numbered after the last one
    pub fn open_account(&self, tax_id: &TaxId) -> Result<AccountNumber> {
        // Lock order: clients, then accounts
        let mut clients = self
            .clients
            .write()
            .map_err(|e| Error::Lock(e.to_string()))?;
        let client = clients
            .get_mut(tax_id)
            .ok_or_else(|| Error::not_found(format!("client {tax_id}")))?;

        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| Error::Lock(e.to_string()))?;
        let number = AccountNumber::new(accounts.len() as u32 + 1);

        let account = Account::checking(number, tax_id.clone(), self.settings.limits)
            .with_agency(self.settings.agency.clone());
        client.add_account(&account)?;
        accounts.insert(number, Arc::new(Mutex::new(account)));

        Ok(number)
    }

    pub fn account(&self, number: AccountNumber) -> Result<Option<SharedAccount>> {
        let accounts = self.accounts.read().map_err(|e| Error::Lock(e.to_string()))?;
        Ok(accounts.get(&number).cloned())
    }

    /// Accounts owned by the client, in the order they were opened
    pub fn client_accounts(&self, tax_id: &TaxId) -> Result<Vec<AccountSummary>> {
        let client = self
            .find_client(tax_id)?
            .ok_or_else(|| Error::not_found(format!("client {tax_id}")))?;

        let mut summaries = Vec::with_capacity(client.own_accounts().len());
        for number in client.own_accounts() {
            if let Some(shared) = self.account(*number)? {
                let account = lock(&shared)?;
                summaries.push(summarize(&account, client.name()));
            }
        }
        Ok(summaries)
    }

    /// Every account, by number
    pub fn accounts(&self) -> Result<Vec<AccountSummary>> {
        let clients = self.clients.read().map_err(|e| Error::Lock(e.to_string()))?;
        let accounts = self.accounts.read().map_err(|e| Error::Lock(e.to_string()))?;

        let mut summaries = Vec::with_capacity(accounts.len());
        for shared in accounts.values() {
            let account = lock(shared)?;
            let holder = clients
                .get(account.owner())
                .map(|c| c.name().to_string())
                .unwrap_or_default();
            summaries.push(summarize(&account, &holder));
        }
        Ok(summaries)
    }

    /// Execute `transaction` on behalf of the client identified by `tax_id`
    pub fn execute(
        &self,
        tax_id: &TaxId,
        number: AccountNumber,
        transaction: Transaction,
    ) -> Result<HistoryEntry> {
        let client = self
            .find_client(tax_id)?
            .ok_or_else(|| Error::not_found(format!("client {tax_id}")))?;
        let shared = self
            .account(number)?
            .ok_or_else(|| Error::not_found(format!("account {number}")))?;

        let mut account = lock(&shared)?;
        let entry = client.execute(&mut account, transaction)?;
        Ok(entry.clone())
    }
}

/// Lock one account, mapping a poisoned mutex to an error
pub fn lock(shared: &SharedAccount) -> Result<MutexGuard<'_, Account>> {
    shared.lock().map_err(|e| Error::Lock(e.to_string()))
}

fn summarize(account: &Account, holder: &str) -> AccountSummary {
    AccountSummary {
        number: account.number(),
        agency: account.agency().to_string(),
        holder: holder.to_string(),
        tax_id: account.owner().clone(),
        balance: account.balance(),
        withdrawals_performed: account.withdrawals_performed(),
    }
}
