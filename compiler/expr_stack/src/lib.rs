//! Stack growth for deep expression trees.
//!
//! Trees reach this workspace from two directions: the external parser, and
//! the transport boundary where an `AnyNode` document of arbitrary nesting is
//! decoded. Every recursive walk (encode, decode, visitors, printer) runs
//! through [`ensure_sufficient_stack`] so a pathological `((((...))))` or a
//! hand-built JSON document cannot overflow the native stack.
//!
//! On native targets the stack is grown with `stacker`. Inside a wasm
//! sandbox the guard is a passthrough.

/// Remaining stack below which we grow (64KB).
const RED_ZONE: usize = 64 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// wasm32: the host engine owns the stack, call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Chain {
        Leaf,
        Link(Box<Chain>),
    }

    fn depth(chain: &Chain) -> usize {
        ensure_sufficient_stack(|| match chain {
            Chain::Leaf => 0,
            Chain::Link(next) => depth(next) + 1,
        })
    }

    #[test]
    fn test_shallow_chain() {
        let chain = Chain::Link(Box::new(Chain::Link(Box::new(Chain::Leaf))));
        assert_eq!(depth(&chain), 2);
    }

    #[test]
    fn test_deep_chain() {
        let mut chain = Chain::Leaf;
        for _ in 0..200_000 {
            chain = Chain::Link(Box::new(chain));
        }
        assert_eq!(depth(&chain), 200_000);

        // Dropping a 200k-deep Box chain recursively would overflow on its own.
        let mut cursor = chain;
        while let Chain::Link(next) = cursor {
            cursor = *next;
        }
    }

    #[test]
    fn test_passes_result_through() {
        let result: Result<u32, &str> = ensure_sufficient_stack(|| Err("bad"));
        assert_eq!(result, Err("bad"));
    }
}
