use bigdecimal::BigDecimal;
use tracing::debug;

use crate::{
    blockchain::from_smallest_units,
    types::{Route, Token},
};

/// The route's quoted output in UI units of `output_token`.
pub fn output_amount_decimal(route: &Route, output_token: &Token) -> BigDecimal {
    from_smallest_units(route.out_amount, output_token.decimals)
}

/// True iff the quoted output strictly exceeds the input amount.
///
/// The two sides are compared as plain numbers even though they are
/// denominated in different tokens; no fee, slippage or price normalisation
/// is applied.
pub fn should_execute(best_route: &Route, input_amount: &BigDecimal, output_token: &Token) -> bool {
    let output_amount = output_amount_decimal(best_route, output_token);

    debug!(
        "Profitability check: output={} {} vs input={}",
        output_amount, output_token.symbol, input_amount
    );

    output_amount > *input_amount
}
