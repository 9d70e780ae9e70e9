// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket office
//!
//! Serves purchase requests one at a time. Pricing is pure; the only shared
//! effect of a sale is the ticket id and sold counter, taken under the state
//! lock.

use crate::error::{EngineError, GateError};
use crate::messages::TicketRequest;
use crate::park::Park;
use lift_core::{price, Clock, Ticket};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct Cashier<C: Clock> {
    park: Arc<Park<C>>,
    inbox: mpsc::Receiver<TicketRequest>,
}

impl<C: Clock> Cashier<C> {
    pub fn new(park: Arc<Park<C>>, inbox: mpsc::Receiver<TicketRequest>) -> Self {
        Self { park, inbox }
    }

    pub async fn run(mut self) -> Result<(), EngineError> {
        tracing::info!("ticket office open");
        loop {
            let request = tokio::select! {
                biased;
                _ = self.park.shutdown_token().cancelled() => break,
                request = self.inbox.recv() => match request {
                    Some(request) => request,
                    None => break,
                },
            };
            match self.serve(request).await {
                Ok(_) => {}
                Err(EngineError::Gate(GateError::Interrupted)) => break,
                Err(e) => tracing::warn!(error = %e, "sale abandoned"),
            }
        }
        tracing::info!("ticket office closed");
        Ok(())
    }

    /// Issue one ticket. Returns the ticket if the buyer received it.
    pub async fn serve(&self, request: TicketRequest) -> Result<Option<Ticket>, EngineError> {
        let park = &self.park;
        let _office = park.gates().ticket_office.acquire(park.shutdown_token()).await?;

        if request.reply.is_closed() {
            tracing::debug!(visitor_id = request.visitor_id, "buyer left before the sale");
            return Ok(None);
        }

        let now = park.now();
        let (ticket_id, closing_at) = {
            let mut state = park.state();
            (state.record_ticket_sale(), state.closing_at())
        };
        let ticket = Ticket::issue(
            ticket_id,
            request.ticket_type,
            request.vip,
            request.visitor_id,
            now,
            closing_at,
            &park.config().tickets,
        );
        let amount = price(request.ticket_type, request.age, &park.config().tickets);

        if request.reply.send(ticket.clone()).is_err() {
            park.state().void_ticket_sale();
            tracing::debug!(visitor_id = request.visitor_id, ticket_id, "sale voided");
            return Ok(None);
        }

        tracing::info!(
            visitor_id = request.visitor_id,
            ticket_id,
            ticket_type = %request.ticket_type,
            age = request.age,
            vip = request.vip,
            amount,
            "ticket sold"
        );
        Ok(Some(ticket))
    }
}

#[cfg(test)]
#[path = "cashier_tests.rs"]
mod tests;
