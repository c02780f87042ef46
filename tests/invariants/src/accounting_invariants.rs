//! Property-based tests for accounting invariants.
//!
//! Properties tested:
//! 1. The coin fee is 3% rounded up, never more than one unit above exact.
//! 2. Transfers only ever destroy supply, by exactly the fees paid.
//! 3. Every sender's nonces run 1, 2, 3, ... through the chain and pool.

#[cfg(test)]
mod tests {
    use {
        crate::fixtures::{bootstrapped, config, wallet},
        blockchat_ledger::{
            amount::{coin_fee, coin_transfer_cost},
            Address,
        },
        proptest::prelude::*,
        std::collections::BTreeMap,
    };

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn coin_fee_is_three_percent_rounded_up(amount in 0..u64::MAX) {
            let fee = coin_fee(amount);
            let exact_hundredths = u128::from(amount) * 3;
            prop_assert!(fee * 100 >= exact_hundredths);
            prop_assert!(fee * 100 < exact_hundredths + 100);
            prop_assert_eq!(coin_transfer_cost(amount), u128::from(amount) + fee);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn transfers_conserve_supply_minus_fees(
            transfers in prop::collection::vec((0..3usize, 0..3usize, 1..50_000u64), 1..20),
        ) {
            let wallets = [wallet(1), wallet(2), wallet(3)];
            let cfg = config(3);
            let supply = cfg.genesis_allocation().unwrap();
            let mut ledger = bootstrapped(cfg, &wallets[0]);

            let mut fees_paid = 0u128;
            for (from, to, amount) in transfers {
                let sender = &wallets[from];
                let nonce = ledger.next_nonce(&sender.address());
                let tx = sender.transfer(wallets[to].address(), amount, nonce);
                if ledger.admit_transaction(tx).is_ok() {
                    fees_paid += coin_fee(amount);
                }
                if ledger.should_mint() == Some(wallets[0].address()) {
                    ledger.mint_block(&wallets[0].address(), Some(0)).unwrap();
                }
            }

            let held: u128 = wallets
                .iter()
                .map(|w| u128::from(ledger.balance_of(&w.address())))
                .sum();
            prop_assert_eq!(held + fees_paid, u128::from(supply));
        }

        #[test]
        fn nonces_are_gapless_per_sender(
            senders in prop::collection::vec(0..3usize, 1..24),
        ) {
            let wallets = [wallet(1), wallet(2), wallet(3)];
            let mut ledger = bootstrapped(config(2), &wallets[0]);
            // fund the others so every sender can pay
            for w in &wallets[1..] {
                let nonce = ledger.next_nonce(&wallets[0].address());
                ledger
                    .admit_transaction(wallets[0].transfer(w.address(), 100_000, nonce))
                    .unwrap();
            }

            for from in senders {
                let sender = &wallets[from];
                let nonce = ledger.next_nonce(&sender.address());
                let tx = sender.transfer(wallet(9).address(), 1, nonce);
                prop_assert!(ledger.admit_transaction(tx).is_ok());
                while ledger.should_mint() == Some(wallets[0].address()) {
                    ledger.mint_block(&wallets[0].address(), Some(0)).unwrap();
                }
            }

            let mut seen: BTreeMap<Address, Vec<u64>> = BTreeMap::new();
            let history = ledger
                .chain()
                .iter()
                .flat_map(|block| block.transactions().iter())
                .chain(ledger.pool().iter())
                .filter(|tx| !tx.sender().is_sentinel());
            for tx in history {
                seen.entry(*tx.sender()).or_default().push(tx.nonce());
            }
            for nonces in seen.values() {
                let expected: Vec<u64> = (1..=nonces.len() as u64).collect();
                prop_assert_eq!(nonces, &expected);
            }
        }
    }
}
