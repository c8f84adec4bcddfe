use crate::draw::{Handle, Param, Props};
use crate::error::{DrawError, GraphError};
use crate::scene::{NodeId, Scene};
use crate::shader::RasterStack;

use super::ctx::LayerCtx;

/// One logged primitive call.
#[derive(Debug, Clone)]
pub struct Command {
    pub key: String,
    pub params: Vec<Param>,
    pub props: Props,
    /// What the last pass produced. Node handles go stale on clear; surface
    /// handles survive and are handed back to the primitive on replay.
    pub last_result: Option<Handle>,
}

/// Named, ordered command log drawing into its own group.
///
/// Commands replay in insertion order, so later commands paint over earlier
/// ones.
#[derive(Debug)]
pub struct Layer {
    name: String,
    container: NodeId,
    commands: Vec<Command>,
}

impl Layer {
    pub(crate) fn new(name: impl Into<String>, container: NodeId) -> Self {
        Self { name: name.into(), container, commands: Vec::new() }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn container(&self) -> NodeId {
        self.container
    }

    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Draws `key` once and logs it.
    ///
    /// Unknown keys and bad arguments are logged and skipped; the command is
    /// not recorded. Only fatal (shader) failures are returned.
    pub fn add(
        &mut self,
        ctx: &mut LayerCtx<'_>,
        key: &str,
        params: Vec<Param>,
        props: Props,
    ) -> Result<Option<Handle>, GraphError> {
        if !ctx.primitives.contains(key) {
            log::warn!("layer \"{}\" cannot draw [{key}]", self.name);
            return Ok(None);
        }

        let frame = ctx.frame(self.container, None);
        match ctx.primitives.invoke(key, &mut ctx.target, &frame, &params, &props) {
            Ok(result) => {
                self.commands.push(Command { key: key.to_string(), params, props, last_result: result });
                Ok(result)
            }
            Err(err) => self.skip_or_fail(key, err).map(|()| None),
        }
    }

    /// Clears the output, then replays every command against `ctx`.
    pub fn draw(&mut self, ctx: &mut LayerCtx<'_>) -> Result<(), GraphError> {
        self.clear(ctx.target.scene);
        for i in 0..self.commands.len() {
            let cmd = &self.commands[i];
            let frame = ctx.frame(self.container, cmd.last_result);
            let result = ctx.primitives.invoke(&cmd.key, &mut ctx.target, &frame, &cmd.params, &cmd.props);
            match result {
                Ok(handle) => self.commands[i].last_result = handle,
                Err(err) => {
                    self.commands[i].last_result = None;
                    let key = self.commands[i].key.clone();
                    self.skip_or_fail(&key, err)?;
                }
            }
        }
        log::trace!("layer \"{}\" redrawn ({} commands)", self.name, self.commands.len());
        Ok(())
    }

    /// Removes the drawn output. The log is kept, so the next
    /// [`draw`](Self::draw) regenerates everything.
    pub fn clear(&self, scene: &mut Scene) {
        scene.clear_children(self.container);
    }

    /// Clears the output, frees the layer's shader surfaces and empties the
    /// log.
    pub fn reset(&mut self, scene: &mut Scene, rasters: &mut RasterStack) {
        self.clear(scene);
        for id in self.commands.drain(..).filter_map(|c| c.last_result?.surface()) {
            rasters.remove(id);
            log::debug!("layer \"{}\" freed shader surface {id:?}", self.name);
        }
    }

    fn skip_or_fail(&self, key: &str, err: DrawError) -> Result<(), GraphError> {
        match err {
            DrawError::Shader(source) => {
                Err(GraphError::Shader { layer: self.name.clone(), key: key.to_string(), source })
            }
            DrawError::Unknown { .. } => {
                log::warn!("layer \"{}\" cannot draw [{key}]", self.name);
                Ok(())
            }
            DrawError::Params { .. } => {
                log::warn!("layer \"{}\" skipped [{key}]: {err}", self.name);
                Ok(())
            }
        }
    }
}
