//! Rendering Boundary
//!
//! What a page hands to its renderer: either a loading affordance or the
//! published model, plus at most one alert message. Built as a single
//! [`View`] over the submitter's output and the status cell, so a request
//! completion that changes both is seen as one transition.

use formcell_reactive::{Submitter, View};

/// Main content of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body<M> {
	/// Nothing has been published yet; show a spinner
	Loading,
	/// The published model; form inputs read and write the draft through lenses
	Loaded(M),
}

impl<M> Body<M> {
	/// Whether the loading affordance is shown
	pub fn is_loading(&self) -> bool {
		matches!(self, Self::Loading)
	}

	/// The published model, if any
	pub fn loaded(&self) -> Option<&M> {
		match self {
			Self::Loading => None,
			Self::Loaded(model) => Some(model),
		}
	}
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered<M> {
	/// Main content
	pub body: Body<M>,
	/// Alert message, if any
	pub alert: Option<String>,
}

/// Combine a submitter's output and a status view into one renderable view
pub fn rendered_view<M>(submitter: &Submitter<M>, status: &View<Option<String>>) -> View<Rendered<M>>
where
	M: Clone + 'static,
{
	let published = View::optional(submitter);
	View::combine(&published, status, |model, alert| Rendered {
		body: match model {
			Some(model) => Body::Loaded(model.clone()),
			None => Body::Loading,
		},
		alert: alert.clone(),
	})
}
