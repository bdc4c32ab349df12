pub mod common;

#[cfg(test)]
mod test_arena;

#[cfg(test)]
mod test_legality;
