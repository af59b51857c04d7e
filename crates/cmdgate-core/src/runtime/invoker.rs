// crates/cmdgate-core/src/runtime/invoker.rs
// ============================================================================
// Module: cmdgate Invocation Compiler
// Description: Builds the reusable callable that runs a command handler.
// Purpose: Resolve handler typing once at registration instead of per request.
// Dependencies: crate::{core, interfaces, runtime::declaration}
// ============================================================================

//! ## Overview
//! Each declaration is compiled once into a [`CompiledInvoker`]: a shared
//! closure taking the bound arguments, the caller context and the service
//! provider. Instance handlers get a fresh module per call with the context
//! attached; stateless handlers are called directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::core::HandlerError;
use crate::core::InvocationContext;
use crate::core::ServiceProvider;
use crate::interfaces::CommandModule;
use crate::runtime::declaration::BoundArguments;
use crate::runtime::declaration::FromArguments;
use crate::runtime::declaration::HandlerOutput;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Future returned by a compiled invoker.
pub type InvokeFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>>;

/// Reusable callable for one command.
pub type CompiledInvoker = Arc<
    dyn Fn(BoundArguments, Arc<InvocationContext>, Arc<ServiceProvider>) -> InvokeFuture
        + Send
        + Sync,
>;

// ============================================================================
// SECTION: Compilation
// ============================================================================

/// Compiles an instance handler declared on module `M`.
pub fn compile_module_handler<M, Args, F, Fut, R>(handler: F) -> CompiledInvoker
where
    M: CommandModule,
    Args: FromArguments,
    F: Fn(M, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerOutput,
{
    let handler = Arc::new(handler);
    Arc::new(
        move |arguments: BoundArguments,
              context: Arc<InvocationContext>,
              services: Arc<ServiceProvider>|
              -> InvokeFuture {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let arguments = Args::from_arguments(arguments)?;
                let mut module = M::create(&services)?;
                module.attach_context(context);
                handler(module, arguments).await.into_completion()
            })
        },
    )
}

/// Compiles a stateless handler.
pub fn compile_static_handler<Args, F, Fut, R>(handler: F) -> CompiledInvoker
where
    Args: FromArguments,
    F: Fn(Arc<InvocationContext>, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerOutput,
{
    let handler = Arc::new(handler);
    Arc::new(
        move |arguments: BoundArguments,
              context: Arc<InvocationContext>,
              _services: Arc<ServiceProvider>|
              -> InvokeFuture {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let arguments = Args::from_arguments(arguments)?;
                handler(context, arguments).await.into_completion()
            })
        },
    )
}
