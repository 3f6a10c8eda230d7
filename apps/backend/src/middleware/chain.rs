//! Ordered middleware composition.
//!
//! [`compose`] turns a list of [`Middleware`] layers into one actix
//! `Transform`. The first layer is the outermost: it runs first on the way
//! in and last on the way out. Each layer decides whether to call
//! [`Next::run`] or to answer the request itself.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;

pub type MiddlewareFuture = LocalBoxFuture<'static, Result<ServiceResponse<BoxBody>, Error>>;

type Endpoint = Rc<dyn Fn(ServiceRequest) -> MiddlewareFuture>;

pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: ServiceRequest, next: Next) -> MiddlewareFuture;
}

impl<F> Middleware for F
where
    F: Fn(ServiceRequest, Next) -> MiddlewareFuture + Send + Sync + 'static,
{
    fn handle(&self, req: ServiceRequest, next: Next) -> MiddlewareFuture {
        self(req, next)
    }
}

/// The remainder of the chain after the current layer.
pub struct Next {
    layers: Arc<[Arc<dyn Middleware>]>,
    position: usize,
    endpoint: Endpoint,
}

impl Next {
    pub fn run(self, req: ServiceRequest) -> MiddlewareFuture {
        match self.layers.get(self.position) {
            Some(layer) => {
                let layer = Arc::clone(layer);
                let next = Next {
                    layers: self.layers,
                    position: self.position + 1,
                    endpoint: self.endpoint,
                };
                layer.handle(req, next)
            }
            None => (self.endpoint)(req),
        }
    }
}

/// A composed chain, built once at startup and shared by every worker.
#[derive(Clone)]
pub struct Stack {
    layers: Arc<[Arc<dyn Middleware>]>,
}

impl Stack {
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

pub fn compose(layers: Vec<Arc<dyn Middleware>>) -> Stack {
    Stack {
        layers: layers.into(),
    }
}

impl<S, B> Transform<S, ServiceRequest> for Stack
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = StackMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StackMiddleware {
            service: Rc::new(service),
            layers: Arc::clone(&self.layers),
        }))
    }
}

pub struct StackMiddleware<S> {
    service: Rc<S>,
    layers: Arc<[Arc<dyn Middleware>]>,
}

impl<S, B> Service<ServiceRequest> for StackMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = MiddlewareFuture;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let endpoint: Endpoint = Rc::new(move |req: ServiceRequest| -> MiddlewareFuture {
            let fut = service.call(req);
            Box::pin(async move { fut.await.map(ServiceResponse::map_into_boxed_body) })
        });

        Next {
            layers: Arc::clone(&self.layers),
            position: 0,
            endpoint,
        }
        .run(req)
    }
}
