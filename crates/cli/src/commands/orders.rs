//! Order queue commands.
//!
//! Transitions go through [`OrderWorkflow`], so only the actions offered
//! from an order's current status can be taken.

use std::io::Write;

use atelier_client::{ApiClient, OrderWorkflow};
use atelier_core::{Order, OrderAction, OrderId};

use super::{CommandError, require_admin};

pub async fn list(api: &ApiClient, out: &mut impl Write) -> Result<(), CommandError> {
    require_admin(api).await?;
    let orders = OrderWorkflow::new(api.clone()).refresh().await?;
    write_orders(&orders, out)?;
    Ok(())
}

pub async fn process(api: &ApiClient, id: OrderId, out: &mut impl Write) -> Result<(), CommandError> {
    transition(api, id, OrderAction::Process, out).await
}

pub async fn complete(
    api: &ApiClient,
    id: OrderId,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    transition(api, id, OrderAction::Complete, out).await
}

async fn transition(
    api: &ApiClient,
    id: OrderId,
    action: OrderAction,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    require_admin(api).await?;
    let workflow = OrderWorkflow::new(api.clone());
    workflow.refresh().await?;
    let orders = workflow.apply(id, action).await?;
    if let Some(status) = workflow.status_of(id).await {
        tracing::info!("Order #{id} is now {status}");
    }
    write_orders(&orders, out)?;
    Ok(())
}

fn write_orders(orders: &[Order], out: &mut impl Write) -> std::io::Result<()> {
    for order in orders {
        let total = order
            .total_amount
            .map_or_else(|| "-".to_owned(), |amount| amount.to_string());
        writeln!(
            out,
            "#{:<5} {:<11} {:<13} {:>10}  {} <{}>",
            order.id,
            order.status.as_str(),
            order.order_type.as_str(),
            total,
            order.customer_name,
            order.customer_email,
        )?;
    }
    Ok(())
}
