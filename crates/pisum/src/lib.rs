#![crate_name = "pisum"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Private Intersection-Sum with Cardinality.
//!
//! Party one holds a set of identifiers, party two holds identifiers
//! associated with non-negative integer values. The protocol lets party one
//! learn the number of common identifiers and the sum of the values attached
//! to them, and nothing else, in the semi-honest model. Identifiers are
//! blinded by commutative exponentiation in a prime-order group, and values
//! are carried under the Paillier additively homomorphic encryption scheme.
//!
//! ```no_run
//! use pisum::protocol::{run_protocol, PartyOne, PartyTwo};
//! use num_bigint::BigUint;
//! use pisum::ProtocolParameters;
//! use rand::thread_rng;
//!
//! # fn main() -> Result<(), pisum::Error> {
//! let mut rng = thread_rng();
//! let par = ProtocolParameters::default_arc();
//!
//! let mut p1 = PartyOne::new(["alice", "bob", "carol"], &par, &mut rng);
//! let mut p2 = PartyTwo::new([("bob", 10u64), ("carol", 20), ("dave", 30)], &par, &mut rng)?;
//!
//! let output = run_protocol(&mut p1, &mut p2, &mut rng)?;
//! assert_eq!(output.cardinality, 2);
//! assert_eq!(output.sum, BigUint::from(30u32));
//! # Ok(())
//! # }
//! ```

mod errors;
mod parameters;

pub mod paillier;
pub mod proto;
pub mod protocol;

pub use errors::{Error, ParametersError, Result};
pub use parameters::{ProtocolParameters, ProtocolParametersBuilder};
