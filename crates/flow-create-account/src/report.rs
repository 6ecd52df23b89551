//! Human-readable progress output on stdout.

use std::io::{self, Write};

use flow_kit::{Account, Address, Block, PollEvent, PrivateKey};

/// Writes the run report to `out`.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Reference block metadata.
    pub fn block(&mut self, block: &Block) -> io::Result<()> {
        writeln!(self.out, "block ID: {}", block.id())?;
        writeln!(self.out, "block height: {}", block.height())?;
        writeln!(self.out, "block timestamp: {}", block.header.timestamp)
    }

    /// Sponsor account metadata.
    pub fn sponsor(&mut self, account: &Account) -> io::Result<()> {
        writeln!(self.out, "sponsor account address: {}", account.address)?;
        writeln!(self.out, "sponsor account balance: {}", account.balance)?;
        writeln!(
            self.out,
            "sponsor account contracts: {}",
            account.contracts.len()
        )?;
        writeln!(self.out, "sponsor account keys: {}", account.keys.len())
    }

    /// Seal progress: a header line, one dot per pending query, then the
    /// sealed line.
    pub fn poll_event(&mut self, event: &PollEvent) -> io::Result<()> {
        match event {
            PollEvent::Waiting { id } => {
                writeln!(self.out, "waiting for transaction {} to be sealed...", id)
            }
            PollEvent::Tick { .. } => {
                write!(self.out, ".")?;
                self.out.flush()
            }
            PollEvent::Sealed { id } => {
                writeln!(self.out)?;
                writeln!(self.out, "transaction {} sealed", id)
            }
        }
    }

    /// Final line with the new address and its private key.
    pub fn created(&mut self, address: &Address, private_key: &PrivateKey) -> io::Result<()> {
        writeln!(
            self.out,
            "account created with address: {}, private key: 0x{}",
            address,
            private_key.to_hex()
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_kit::{HashAlgorithm, Identifier, SignatureAlgorithm, TransactionStatus, testing};

    fn output(f: impl FnOnce(&mut Reporter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut reporter = Reporter::new(Vec::new());
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_block_lines() {
        let block = testing::block(100);
        let text = output(|r| r.block(&block));
        assert_eq!(
            text,
            format!(
                "block ID: {}\nblock height: 100\nblock timestamp: 2024-01-01T00:00:00Z\n",
                block.id()
            )
        );
    }

    #[test]
    fn test_sponsor_lines() {
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaP256, &[2u8; 32]).unwrap();
        let account = testing::account(
            "f8d6e0586b0a20c7".parse().unwrap(),
            1000,
            &key,
            HashAlgorithm::Sha3_256,
            0,
        );
        let text = output(|r| r.sponsor(&account));
        assert_eq!(
            text,
            "sponsor account address: 0xf8d6e0586b0a20c7\n\
             sponsor account balance: 1000\n\
             sponsor account contracts: 0\n\
             sponsor account keys: 1\n"
        );
    }

    #[test]
    fn test_poll_progress() {
        let id = Identifier::hash(b"tx");
        let text = output(|r| {
            r.poll_event(&PollEvent::Waiting { id })?;
            for attempt in 1..=3 {
                r.poll_event(&PollEvent::Tick {
                    attempt,
                    status: TransactionStatus::Pending,
                })?;
            }
            r.poll_event(&PollEvent::Sealed { id })
        });
        assert_eq!(
            text,
            format!(
                "waiting for transaction {id} to be sealed...\n...\ntransaction {id} sealed\n"
            )
        );
    }

    #[test]
    fn test_created_line() {
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaP256, &[3u8; 32]).unwrap();
        let address: Address = "0xABCD".parse().unwrap();
        let text = output(|r| r.created(&address, &key));
        assert_eq!(
            text,
            format!(
                "account created with address: 0xabcd, private key: 0x{}\n",
                key.to_hex()
            )
        );
    }
}
